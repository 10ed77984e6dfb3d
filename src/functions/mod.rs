//! The builtin function table.
//!
//! Builtins do not share one calling convention: some evaluate their
//! arguments eagerly, others read raw argument text. Each builtin therefore
//! declares a [`CallShape`], and the evaluator dispatches on the shape
//! rather than on per-function closures.

/// A function the expression language knows by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Min,
    Max,
    Count,
    Snippet,
    Distance,
}

/// The calling convention of a builtin.
pub enum CallShape {
    /// Evaluate every argument to a number, then fold. At least one
    /// argument is required; an empty call is a contract violation.
    NumericFold(fn(f64, f64) -> f64),
    /// Do not evaluate the argument; read its raw identifier text and
    /// consult the document's field store.
    RawFieldName,
    /// Do not evaluate the arguments; read a raw query plus a field name
    /// and consult the inverted index. Extra arguments are ignored.
    QueryAndField,
    /// Recognized but deliberately not executable on this runtime.
    Unsupported,
}

impl Builtin {
    pub fn lookup(name: &str) -> Option<Builtin> {
        match name {
            "min" => Some(Builtin::Min),
            "max" => Some(Builtin::Max),
            "count" => Some(Builtin::Count),
            "snippet" => Some(Builtin::Snippet),
            "distance" => Some(Builtin::Distance),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Min => "min",
            Builtin::Max => "max",
            Builtin::Count => "count",
            Builtin::Snippet => "snippet",
            Builtin::Distance => "distance",
        }
    }

    pub fn shape(self) -> CallShape {
        match self {
            Builtin::Min => CallShape::NumericFold(f64::min),
            Builtin::Max => CallShape::NumericFold(f64::max),
            Builtin::Count => CallShape::RawFieldName,
            Builtin::Snippet => CallShape::QueryAndField,
            Builtin::Distance => CallShape::Unsupported,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_knows_every_builtin() {
        for name in ["min", "max", "count", "snippet", "distance"] {
            let builtin = Builtin::lookup(name).unwrap();
            assert_eq!(builtin.name(), name);
        }
        assert_eq!(Builtin::lookup("geopoint"), None);
    }
}
