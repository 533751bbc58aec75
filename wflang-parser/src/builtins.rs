//! Builtin function catalog
//!
//! Every builtin WFLang function is described once, as data, in [`table`].
//! The lexer uses the catalog to classify words, and hover, completion and
//! signature help read signatures and docstrings from it. Keys are the
//! lowercased function names; [`lookup`] lowercases for callers.

mod table;

use crate::object::TypeTag;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// One parameter of a builtin signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param {
    pub name: &'static str,
    /// Permitted argument types.
    pub types: &'static [TypeTag],
    pub optional: bool,
    /// The parameter may repeat any number of times.
    pub variadic: bool,
    /// First half of a repeating key/value pair.
    pub pair_first: bool,
    /// Second half of a repeating key/value pair.
    pub pair_second: bool,
    pub doc: &'static str,
}

impl Param {
    pub const fn new(name: &'static str, types: &'static [TypeTag], doc: &'static str) -> Self {
        Self {
            name,
            types,
            optional: false,
            variadic: false,
            pair_first: false,
            pair_second: false,
            doc,
        }
    }

    pub const fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub const fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    pub const fn pair_first(mut self) -> Self {
        self.pair_first = true;
        self.variadic = true;
        self
    }

    pub const fn pair_second(mut self) -> Self {
        self.pair_second = true;
        self.variadic = true;
        self
    }

    /// `name?: a|b...` as shown in signatures.
    pub fn label(&self) -> String {
        let types = self
            .types
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join("|");
        format!(
            "{}{}: {}{}",
            self.name,
            if self.optional { "?" } else { "" },
            types,
            if self.variadic { "..." } else { "" }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Function {
    /// Lowercased catalog key.
    pub name: &'static str,
    /// Conventional spelling, e.g. `sumTime`.
    pub display_name: &'static str,
    pub return_type: TypeTag,
    pub params: &'static [Param],
    pub summary: &'static str,
}

impl Function {
    pub fn is_variadic(&self) -> bool {
        self.params.iter().any(|p| p.variadic)
    }

    /// Signature label, e.g. `min(args: number...)`.
    pub fn signature(&self) -> String {
        let params = self
            .params
            .iter()
            .map(Param::label)
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}({})", self.display_name, params)
    }

    /// Half-open byte offsets of each parameter label within [`signature`].
    ///
    /// [`signature`]: Function::signature
    pub fn param_label_offsets(&self) -> Vec<[u32; 2]> {
        let mut offsets = Vec::with_capacity(self.params.len());
        let mut cursor = self.display_name.len() + 1;
        for (idx, param) in self.params.iter().enumerate() {
            if idx > 0 {
                cursor += 2;
            }
            let len = param.label().len();
            offsets.push([cursor as u32, (cursor + len) as u32]);
            cursor += len;
        }
        offsets
    }

    /// Parameter index an argument position maps to. Positions past the end
    /// cycle through the variadic tail, or stick to the last parameter.
    pub fn param_index(&self, argument: usize) -> usize {
        let count = self.params.len();
        if count == 0 {
            return 0;
        }
        if argument < count {
            return argument;
        }
        match self.params.iter().position(|p| p.variadic) {
            Some(first) => first + (argument - first) % (count - first),
            None => count - 1,
        }
    }

    /// Heading shown in docs: the display name with its first letter raised.
    pub fn title(&self) -> String {
        let mut chars = self.display_name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Markdown documentation: fenced signature with return type, heading,
    /// summary, then one `@param` line per parameter.
    pub fn docstring(&self) -> String {
        let mut doc = format!(
            "```wflang\n{}\n// returns {}\n```\n### {}\n{}\n\n",
            self.signature(),
            self.return_type,
            self.title(),
            self.summary
        );
        for param in self.params {
            doc.push_str(&param_doc(param));
            doc.push_str("\n\n");
        }
        doc
    }
}

/// `@param` line for one parameter.
pub fn param_doc(param: &Param) -> String {
    format!("@param `{}` - {}", param.label(), param.doc)
}

static CATALOG: Lazy<HashMap<&'static str, &'static Function>> = Lazy::new(|| {
    table::FUNCTIONS
        .iter()
        .map(|function| (function.name, function))
        .collect()
});

/// Case-insensitive catalog lookup.
pub fn lookup(name: &str) -> Option<&'static Function> {
    CATALOG.get(name.to_ascii_lowercase().as_str()).copied()
}

pub fn is_builtin(word: &str) -> bool {
    lookup(word).is_some()
}

/// All builtins, sorted by key.
pub fn all() -> Vec<&'static Function> {
    let mut functions: Vec<_> = CATALOG.values().copied().collect();
    functions.sort_by_key(|f| f.name);
    functions
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_catalog_keys_are_lowercase_and_unique() {
        assert_eq!(CATALOG.len(), table::FUNCTIONS.len());
        assert_eq!(all().len(), 69);
        for function in all() {
            assert_eq!(function.name, function.name.to_ascii_lowercase());
            assert_eq!(function.name, function.display_name.to_ascii_lowercase());
        }
    }

    #[rstest]
    #[case("sumTime")]
    #[case("SUMTIME")]
    #[case("employee_attribute")]
    #[case("averageException")]
    fn test_lookup_ignores_case(#[case] name: &str) {
        assert!(is_builtin(name));
    }

    #[test]
    fn test_min_signature_and_docstring() {
        let min = lookup("min").unwrap();
        assert!(min.is_variadic());
        assert_eq!(min.signature(), "min(args: number...)");
        assert_eq!(min.param_label_offsets(), vec![[4, 19]]);
        let doc = min.docstring();
        assert!(doc.starts_with("```wflang\nmin(args: number...)\n// returns number\n```\n### Min\n"));
        assert!(doc.contains("@param `args: number...` - "));
    }

    #[test]
    fn test_docstrings_list_every_parameter() {
        for function in all() {
            let doc = function.docstring();
            assert_eq!(doc.matches("\n@param `").count(), function.params.len(), "{}", function.name);
            assert!(doc.ends_with("\n\n"), "{}", function.name);
        }
    }

    #[test]
    fn test_offsets_slice_out_labels() {
        for function in all() {
            let signature = function.signature();
            for (param, [start, end]) in function.params.iter().zip(function.param_label_offsets()) {
                assert_eq!(&signature[start as usize..end as usize], param.label());
            }
        }
    }

    #[test]
    fn test_param_index_cycles_pairs() {
        let lookup_fn = lookup("ldLookup").unwrap();
        assert_eq!(lookup_fn.param_index(0), 0);
        assert_eq!(lookup_fn.param_index(2), 2);
        assert_eq!(lookup_fn.param_index(3), 1);
        assert_eq!(lookup_fn.param_index(4), 2);

        let contains = lookup("contains").unwrap();
        assert_eq!(contains.param_index(5), 1);

        let min = lookup("min").unwrap();
        assert_eq!(min.param_index(7), 0);
    }

    #[test]
    fn test_sum_time_parameters() {
        let sum_time = lookup("sumtime").unwrap();
        assert_eq!(sum_time.display_name, "sumTime");
        let names: Vec<_> = sum_time.params.iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["range", "sumExpression", "condition"]);
        assert!(sum_time.params[2].optional);
    }
}
