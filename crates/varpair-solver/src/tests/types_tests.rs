use super::*;

const LIST: DeclaratorId = DeclaratorId(1);
const STR: DeclaratorId = DeclaratorId(2);
const T: TypeParamId = TypeParamId(10);
const U: TypeParamId = TypeParamId(11);

#[test]
fn test_kind_discriminator() {
    assert_eq!(TypeRef::plain(STR).kind(), TypeRefKind::Parameterized);
    assert_eq!(TypeRef::param(T).kind(), TypeRefKind::Parameterized);
    assert_eq!(TypeRef::array(TypeRef::Any).kind(), TypeRefKind::Array);
    assert_eq!(TypeRef::unbounded_wildcard().kind(), TypeRefKind::Wildcard);
    assert_eq!(
        TypeRef::unbound(T, InferenceHandle(0)).kind(),
        TypeRefKind::Unbound
    );
    assert_eq!(TypeRef::Any.kind(), TypeRefKind::Any);
}

#[test]
fn test_bare_parameter_vs_declarator() {
    let bare = TypeRef::param(T);
    assert_eq!(bare.bare_parameter(), Some(T));
    assert_eq!(bare.declarator(), None);

    let list = TypeRef::declared(LIST, vec![TypeRef::param(T)]);
    assert_eq!(list.bare_parameter(), None);
    assert_eq!(list.declarator(), Some(LIST));
    assert_eq!(list.type_arguments().len(), 1);
}

#[test]
fn test_referenced_parameter_includes_unbound() {
    let unbound = TypeRef::unbound(T, InferenceHandle(3));
    assert_eq!(unbound.referenced_parameter(), Some(T));
    assert_eq!(unbound.bare_parameter(), None);
    assert_eq!(TypeRef::plain(STR).referenced_parameter(), None);
}

#[test]
fn test_unbound_equality_is_by_handle() {
    let a = TypeRef::unbound(T, InferenceHandle(7));
    let b = TypeRef::unbound(U, InferenceHandle(7));
    let c = TypeRef::unbound(T, InferenceHandle(8));
    assert_eq!(a, b);
    assert_ne!(a, c);

    let mut set = rustc_hash::FxHashSet::default();
    set.insert(a);
    assert!(set.contains(&b));
    assert!(!set.contains(&c));
}

#[test]
fn test_wildcard_accessors() {
    let upper = TypeRef::extends(vec![TypeRef::plain(STR)]);
    let wildcard = upper.as_wildcard().expect("wildcard");
    assert!(wildcard.lower_bound().is_none());
    assert_eq!(wildcard.upper_bounds().len(), 1);
    assert!(!wildcard.is_unbounded());

    let lower = TypeRef::super_of(TypeRef::param(T));
    let wildcard = lower.as_wildcard().expect("wildcard");
    assert_eq!(wildcard.lower_bound(), Some(&TypeRef::param(T)));
    assert!(wildcard.upper_bounds().is_empty());

    assert!(
        TypeRef::unbounded_wildcard()
            .as_wildcard()
            .is_some_and(WildcardRef::is_unbounded)
    );
}

#[test]
fn test_component_type() {
    let array = TypeRef::array(TypeRef::array(TypeRef::param(T)));
    let inner = array.component_type().expect("outer component");
    assert_eq!(inner.component_type(), Some(&TypeRef::param(T)));
    assert_eq!(TypeRef::Any.component_type(), None);
}
