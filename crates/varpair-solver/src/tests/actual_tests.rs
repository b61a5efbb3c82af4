use super::*;
use crate::declarator::DeclaratorStore;
use crate::owner::{InferenceTable, Unresolved};
use crate::types::DeclaratorId;
use crate::variance::VarianceInfo;

struct Fixture {
    store: DeclaratorStore,
    num: TypeRef,
    int: TypeRef,
    str_: TypeRef,
    pair: DeclaratorId,
    t: TypeParamId,
    u: TypeParamId,
}

fn fixture() -> Fixture {
    let store = DeclaratorStore::new();
    let obj = store.class("Obj", &[]);
    let num = store.class("Num", &[]);
    let int = store.class("Int", &[]);
    let str_ = store.class("Str", &[]);
    store.add_supertype(num, TypeRef::plain(obj)).expect("Num");
    store.add_supertype(int, TypeRef::plain(num)).expect("Int");
    store.add_supertype(str_, TypeRef::plain(obj)).expect("Str");
    let pair = store.class("Pair", &["A", "B"]);
    let op = store.operation("op", &["T", "U"]);
    let t = store.type_param(op, 0).expect("op.T");
    let u = store.type_param(op, 1).expect("op.U");
    Fixture {
        num: TypeRef::plain(num),
        int: TypeRef::plain(int),
        str_: TypeRef::plain(str_),
        store,
        pair,
        t,
        u,
    }
}

#[test]
fn test_out_occurrences_merge_to_common_supertype() {
    let f = fixture();
    let mut collector = ActualTypeArgumentCollector::new(&f.store, &Unresolved, [f.t]);
    collector.populate(&TypeRef::param(f.t), &f.int);
    collector.populate(&TypeRef::param(f.t), &f.num);

    assert_eq!(collector.occurrences_of(f.t).len(), 2);
    let mapping = collector.type_parameter_mapping();
    let bound = &mapping[&f.t];
    assert_eq!(bound.type_reference(), &f.num);
    assert_eq!(bound.variance(), VarianceInfo::Out);
    assert!(!bound.is_inconsistent());
}

#[test]
fn test_repeated_invariant_agreement_is_consistent() {
    let f = fixture();
    let mut collector = ActualTypeArgumentCollector::new(&f.store, &Unresolved, [f.t]);
    collector.populate(
        &TypeRef::declared(f.pair, vec![TypeRef::param(f.t), TypeRef::param(f.t)]),
        &TypeRef::declared(f.pair, vec![f.str_.clone(), f.str_.clone()]),
    );
    let mapping = collector.type_parameter_mapping();
    assert_eq!(mapping[&f.t].type_reference(), &f.str_);
    assert_eq!(mapping[&f.t].variance(), VarianceInfo::Invariant);
    assert!(!mapping[&f.t].is_inconsistent());
}

#[test]
fn test_conflicting_invariant_occurrences_are_inconsistent() {
    let f = fixture();
    let mut collector = ActualTypeArgumentCollector::new(&f.store, &Unresolved, [f.t]);
    collector.populate(
        &TypeRef::declared(f.pair, vec![TypeRef::param(f.t), TypeRef::param(f.t)]),
        &TypeRef::declared(f.pair, vec![f.str_.clone(), f.num.clone()]),
    );
    let mapping = collector.type_parameter_mapping();
    assert_eq!(mapping.len(), 1);
    assert!(mapping[&f.t].is_inconsistent());
}

#[test]
fn test_parameters_outside_the_set_are_ignored() {
    let f = fixture();
    let table = InferenceTable::new();
    let mut collector = ActualTypeArgumentCollector::new(&f.store, &table, [f.t]);
    collector.populate(
        &TypeRef::declared(f.pair, vec![TypeRef::param(f.t), TypeRef::param(f.u)]),
        &TypeRef::declared(f.pair, vec![f.str_.clone(), f.num.clone()]),
    );
    collector.populate(&table.fresh_unbound(f.u), &f.int);
    assert_eq!(collector.occurrences().len(), 1);
    assert!(collector.occurrences_of(f.u).is_empty());
}

#[test]
fn test_empty_set_collects_everything() {
    let f = fixture();
    let mut collector = ActualTypeArgumentCollector::new(&f.store, &Unresolved, Vec::new());
    collector.populate(
        &TypeRef::declared(f.pair, vec![TypeRef::param(f.t), TypeRef::param(f.u)]),
        &TypeRef::declared(f.pair, vec![f.str_.clone(), f.num.clone()]),
    );
    let keys: Vec<_> = collector.occurrences().keys().copied().collect();
    assert_eq!(keys, vec![f.t, f.u]);
}

#[test]
fn test_occurrence_records_variance_and_origin() {
    let f = fixture();
    let mut collector = ActualTypeArgumentCollector::new(&f.store, &Unresolved, [f.t]);
    let declared = TypeRef::super_of(TypeRef::param(f.t));
    collector.populate(&declared, &f.int);

    let occurrence = &collector.occurrences_of(f.t)[0];
    assert_eq!(occurrence.reference, f.int);
    assert_eq!(occurrence.declared_variance, VarianceInfo::In);
    assert_eq!(occurrence.actual_variance, VarianceInfo::Invariant);
    assert_eq!(occurrence.variance(), VarianceInfo::In);
    assert_eq!(occurrence.origin.as_ref(), Some(&declared));
}

#[test]
fn test_configured_limits_apply() {
    let f = fixture();
    let options = SolverOptions {
        max_walk_depth: 1,
        ..SolverOptions::default()
    };
    let mut collector = ActualTypeArgumentCollector::with_options(&f.store, &Unresolved, [f.t], &options);
    collector.populate(
        &TypeRef::array(TypeRef::param(f.t)),
        &TypeRef::array(f.str_.clone()),
    );
    assert!(collector.occurrences().is_empty());

    collector.populate(&TypeRef::param(f.t), &f.str_);
    assert_eq!(collector.into_occurrences()[&f.t].len(), 1);
}
