//! End-to-end pairing scenarios through the public API.

use rustc_hash::FxHashSet;
use varpair_solver::{
    ActualTypeArgumentCollector, DeclaratorId, DeclaratorStore, InferenceTable, ReferenceOwner,
    SolverOptions, TypeFormatter, TypeModel, TypeParamId, TypeRef, TypeReferencePairWalker,
    Unresolved, VarianceInfo, WalkState,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

struct World {
    store: DeclaratorStore,
    num: TypeRef,
    int: TypeRef,
    str_: TypeRef,
    pair: DeclaratorId,
    comparable: DeclaratorId,
    list: DeclaratorId,
    array_list: DeclaratorId,
    t: TypeParamId,
    u: TypeParamId,
}

fn world() -> World {
    let store = DeclaratorStore::new();
    let obj = store.class("Obj", &[]);
    let num = store.class("Num", &[]);
    let int = store.class("Int", &[]);
    let str_ = store.class("Str", &[]);
    let pair = store.class("Pair", &["A", "B"]);
    let comparable = store.interface("Comparable", &["T"]);
    let list = store.interface("List", &["E"]);
    let array_list = store.class("ArrayList", &["E"]);

    store.add_supertype(num, TypeRef::plain(obj)).expect("Num");
    store.add_supertype(int, TypeRef::plain(num)).expect("Int");
    store.add_supertype(str_, TypeRef::plain(obj)).expect("Str");
    store
        .add_supertype(str_, TypeRef::declared(comparable, vec![TypeRef::plain(str_)]))
        .expect("Str");
    let array_list_e = store.type_param(array_list, 0).expect("ArrayList.E");
    store
        .add_supertype(array_list, TypeRef::declared(list, vec![TypeRef::param(array_list_e)]))
        .expect("ArrayList");

    let sort = store.operation("sort", &["T", "U"]);
    let t = store.type_param(sort, 0).expect("sort.T");
    let u = store.type_param(sort, 1).expect("sort.U");
    store
        .set_bounds(t, vec![TypeRef::declared(comparable, vec![TypeRef::param(t)])])
        .expect("T bound");

    World {
        num: TypeRef::plain(num),
        int: TypeRef::plain(int),
        str_: TypeRef::plain(str_),
        store,
        pair,
        comparable,
        list,
        array_list,
        t,
        u,
    }
}

#[test]
fn test_pair_of_same_parameter_agrees() {
    init_tracing();
    let w = world();
    let declared = w
        .store
        .instantiate(w.pair, vec![TypeRef::param(w.t), TypeRef::param(w.t)])
        .expect("Pair<T, T>");
    let actual = w
        .store
        .instantiate(w.pair, vec![w.str_.clone(), w.str_.clone()])
        .expect("Pair<Str, Str>");

    let mut collector = ActualTypeArgumentCollector::new(&w.store, &Unresolved, [w.t]);
    collector.populate(&declared, &actual);
    let mapping = collector.type_parameter_mapping();
    assert_eq!(
        TypeFormatter::new(&w.store).format_mapping(&mapping),
        "T -> Str (invariant)"
    );
}

#[test]
fn test_pair_of_same_parameter_conflicts() {
    init_tracing();
    let w = world();
    let declared = TypeRef::declared(w.pair, vec![TypeRef::param(w.t), TypeRef::param(w.t)]);
    let actual = TypeRef::declared(w.pair, vec![w.str_.clone(), w.num.clone()]);

    let mut collector = ActualTypeArgumentCollector::new(&w.store, &Unresolved, [w.t]);
    collector.populate(&declared, &actual);
    let mapping = collector.type_parameter_mapping();
    assert!(mapping[&w.t].is_inconsistent());
    assert_eq!(collector.occurrences_of(w.t).len(), 2);
}

#[test]
fn test_covariant_occurrences_widen() {
    init_tracing();
    let w = world();
    let declared = TypeRef::extends(vec![TypeRef::param(w.u)]);

    let mut collector = ActualTypeArgumentCollector::new(&w.store, &Unresolved, [w.u]);
    collector.populate(&declared, &w.int);
    collector.populate(&declared, &w.str_);
    let mapping = collector.type_parameter_mapping();
    let formatter = TypeFormatter::new(&w.store);
    assert_eq!(formatter.format(mapping[&w.u].type_reference()), "Obj");
    assert_eq!(mapping[&w.u].variance(), VarianceInfo::Out);
}

#[test]
fn test_contravariant_occurrences_narrow() {
    init_tracing();
    let w = world();
    let declared = TypeRef::super_of(TypeRef::param(w.u));

    let mut collector = ActualTypeArgumentCollector::new(&w.store, &Unresolved, [w.u]);
    collector.populate(&declared, &w.num);
    collector.populate(&declared, &w.int);
    let mapping = collector.type_parameter_mapping();
    assert_eq!(mapping[&w.u].type_reference(), &w.int);
    assert_eq!(mapping[&w.u].variance(), VarianceInfo::In);
    assert!(!mapping[&w.u].is_inconsistent());
}

#[test]
fn test_element_of_nested_arrays() {
    init_tracing();
    let w = world();
    let declared = TypeRef::array(TypeRef::array(TypeRef::param(w.t)));
    let actual = TypeRef::array(TypeRef::array(w.str_.clone()));

    let mut collector = ActualTypeArgumentCollector::new(&w.store, &Unresolved, [w.t]);
    collector.populate(&declared, &actual);
    let occurrence = &collector.occurrences_of(w.t)[0];
    assert_eq!(occurrence.reference, w.str_);
    assert_eq!(occurrence.variance(), VarianceInfo::Out);
}

#[test]
fn test_inference_variable_resolved_to_itself_terminates() {
    init_tracing();
    let w = world();
    let table = InferenceTable::new();
    let declared = table.fresh_unbound(w.t);
    let handle = declared.as_unbound().expect("inference variable").handle;
    table
        .resolve(handle, TypeRef::declared(w.comparable, vec![declared.clone()]))
        .expect("resolve");

    let actual = TypeRef::declared(
        w.comparable,
        vec![TypeRef::declared(w.comparable, vec![w.str_.clone()])],
    );
    let mut collector = ActualTypeArgumentCollector::new(&w.store, &table, [w.t]);
    collector.populate(&declared, &actual);
    assert!(collector.occurrences().is_empty());
}

#[test]
fn test_self_bounded_parameter_binds_once() {
    init_tracing();
    let w = world();
    assert_eq!(
        w.store.bounds(w.t),
        vec![TypeRef::declared(w.comparable, vec![TypeRef::param(w.t)])]
    );
    let declared = TypeRef::declared(w.comparable, vec![TypeRef::param(w.t)]);

    let mut collector = ActualTypeArgumentCollector::new(&w.store, &Unresolved, [w.t]);
    collector.populate(&declared, &w.str_);
    let occurrences = collector.occurrences_of(w.t);
    assert_eq!(occurrences.len(), 1);
    assert_eq!(occurrences[0].reference, w.str_);
    assert_eq!(occurrences[0].variance(), VarianceInfo::Invariant);

    let mapping = collector.type_parameter_mapping();
    assert!(!mapping[&w.t].is_inconsistent());
    assert_eq!(
        TypeFormatter::new(&w.store).format_mapping(&mapping),
        "T -> Str (invariant)"
    );
}

#[test]
fn test_open_variables_bind_then_substitute_once_resolved() {
    init_tracing();
    let w = world();
    let table = InferenceTable::new();
    let open_t = table.fresh_unbound(w.t);
    let declared = TypeRef::declared(w.pair, vec![open_t.clone(), TypeRef::param(w.u)]);
    let actual = TypeRef::declared(w.pair, vec![w.str_.clone(), w.int.clone()]);

    let mut first = ActualTypeArgumentCollector::new(&w.store, &table, Vec::new());
    first.populate(&declared, &actual);
    let keys: Vec<_> = first.occurrences().keys().copied().collect();
    assert_eq!(keys, vec![w.t, w.u]);

    let handle = open_t.as_unbound().expect("inference variable").handle;
    table.resolve(handle, w.str_.clone()).expect("resolve");
    let mut second = ActualTypeArgumentCollector::new(&w.store, &table, Vec::new());
    second.populate(&declared, &actual);
    let keys: Vec<_> = second.occurrences().keys().copied().collect();
    assert_eq!(keys, vec![w.u]);
}

#[test]
fn test_options_from_json_limit_the_walk() {
    init_tracing();
    let w = world();
    let options: SolverOptions = serde_json::from_str(r#"{ "maxWalkDepth": 2 }"#).expect("options");
    assert_eq!(options.max_walk_iterations, SolverOptions::default().max_walk_iterations);

    let declared = TypeRef::array(TypeRef::array(TypeRef::param(w.t)));
    let actual = TypeRef::array(TypeRef::array(w.str_.clone()));
    let mut collector = ActualTypeArgumentCollector::with_options(&w.store, &Unresolved, [w.t], &options);
    collector.populate(&declared, &actual);
    assert!(collector.occurrences().is_empty());
}

/// A walker that refuses to align through parameter-valued declared
/// arguments and never binds declared arrays.
struct Strict<'a> {
    store: &'a DeclaratorStore,
    state: WalkState,
    seen: Vec<(TypeParamId, TypeRef)>,
}

impl TypeReferencePairWalker for Strict<'_> {
    fn model(&self) -> &dyn TypeModel {
        self.store
    }

    fn owner(&self) -> &dyn ReferenceOwner {
        &Unresolved
    }

    fn walk_state(&self) -> &WalkState {
        &self.state
    }

    fn walk_state_mut(&mut self) -> &mut WalkState {
        &mut self.state
    }

    fn process_type_parameter(&mut self, param: TypeParamId, reference: &TypeRef) {
        self.seen.push((param, reference.clone()));
    }

    fn should_process_in_context_of(
        &self,
        _declared_param: TypeParamId,
        bound_params: &[TypeParamId],
        visited: &FxHashSet<TypeParamId>,
    ) -> bool {
        assert!(!bound_params.is_empty());
        assert!(!visited.is_empty());
        false
    }

    fn traverse_array(&mut self, _declared: &TypeRef, _component: &TypeRef, _actual: &TypeRef) {}
}

#[test]
fn test_overridden_hooks_take_effect() {
    init_tracing();
    let w = world();
    let mut walker = Strict {
        store: &w.store,
        state: WalkState::new(),
        seen: Vec::new(),
    };

    walker.process_paired_references(
        &TypeRef::declared(w.list, vec![TypeRef::param(w.t)]),
        &TypeRef::declared(w.array_list, vec![w.str_.clone()]),
    );
    walker.process_paired_references(
        &TypeRef::array(TypeRef::param(w.t)),
        &TypeRef::array(w.str_.clone()),
    );
    assert!(walker.seen.is_empty());

    walker.process_paired_references(&TypeRef::param(w.t), &w.str_);
    assert_eq!(walker.seen, vec![(w.t, w.str_.clone())]);
}
