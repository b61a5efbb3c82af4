//! Human-readable rendering of type references.
//!
//! | reference | rendering |
//! |-----------|-----------|
//! | declarator | `List<Str>`, `Str` |
//! | bare parameter | `T` |
//! | array | `Str[]` |
//! | wildcard | `?`, `? extends A & B`, `? super Int` |
//! | inference variable | `T'#3` |
//! | any | `*` |

use crate::bound::TypeParameterMapping;
use crate::declarator::DeclaratorStore;
use crate::types::{TypeRef, TypeTarget};
use crate::variance::VarianceInfo;
use std::fmt::Write;

pub struct TypeFormatter<'a> {
    store: &'a DeclaratorStore,
}

impl<'a> TypeFormatter<'a> {
    pub fn new(store: &'a DeclaratorStore) -> Self {
        Self { store }
    }

    pub fn format(&self, reference: &TypeRef) -> String {
        let mut out = String::new();
        self.write_ref(&mut out, reference);
        out
    }

    /// `T -> Str (out), U -> Num (invariant, inconsistent)`.
    pub fn format_mapping(&self, mapping: &TypeParameterMapping) -> String {
        let mut out = String::new();
        for (index, (param, bound)) in mapping.iter().enumerate() {
            if index > 0 {
                out.push_str(", ");
            }
            out.push_str(&self.store.param_name(*param));
            out.push_str(" -> ");
            self.write_ref(&mut out, bound.type_reference());
            out.push_str(" (");
            out.push_str(variance_name(bound.variance()));
            if bound.is_inconsistent() {
                out.push_str(", inconsistent");
            }
            out.push(')');
        }
        out
    }

    fn write_ref(&self, out: &mut String, reference: &TypeRef) {
        match reference {
            TypeRef::Parameterized(p) => {
                match p.target {
                    TypeTarget::Declarator(declarator) => {
                        out.push_str(&self.store.declarator_name(declarator));
                    }
                    TypeTarget::Parameter(param) => out.push_str(&self.store.param_name(param)),
                }
                if !p.arguments.is_empty() {
                    out.push('<');
                    self.write_list(out, &p.arguments, ", ");
                    out.push('>');
                }
            }
            TypeRef::Array(component) => {
                self.write_ref(out, component);
                out.push_str("[]");
            }
            TypeRef::Wildcard(w) => {
                out.push('?');
                if let Some(lower) = w.lower_bound() {
                    out.push_str(" super ");
                    self.write_ref(out, lower);
                } else if !w.upper_bounds().is_empty() {
                    out.push_str(" extends ");
                    self.write_list(out, w.upper_bounds(), " & ");
                }
            }
            TypeRef::Unbound(u) => {
                let _ = write!(out, "{}'#{}", self.store.param_name(u.param), u.handle.index());
            }
            TypeRef::Any => out.push('*'),
        }
    }

    fn write_list(&self, out: &mut String, references: &[TypeRef], separator: &str) {
        for (index, reference) in references.iter().enumerate() {
            if index > 0 {
                out.push_str(separator);
            }
            self.write_ref(out, reference);
        }
    }
}

fn variance_name(variance: VarianceInfo) -> &'static str {
    match variance {
        VarianceInfo::Out => "out",
        VarianceInfo::In => "in",
        VarianceInfo::Invariant => "invariant",
    }
}
