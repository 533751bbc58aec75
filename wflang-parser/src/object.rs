//! Static objects
//!
//! The evaluator labels expressions with an [`Object`]: a type tag plus, for
//! literals, the statically known value. Nothing here is ever executed.

use crate::ast::VarBinding;
use crate::dates::{Clock, Date};
use crate::position::Span;
use serde::Serialize;
use std::fmt;

/// Closed set of WFLang value types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeTag {
    Any,
    Number,
    String,
    Ident,
    Time,
    Date,
    DateTime,
    DateRange,
    DateTimeRange,
    Boolean,
    ScheduleRecord,
    TimeRecord,
    EmployeeAttribute,
    LdRecord,
    TorDetailRecord,
    ResultSet,
    TimeRecordGroup,
    Exception,
    Day,
    Week,
    Period,
    Null,
    Undefined,
}

impl TypeTag {
    pub fn as_str(self) -> &'static str {
        match self {
            TypeTag::Any => "any",
            TypeTag::Number => "number",
            TypeTag::String => "string",
            TypeTag::Ident => "ident",
            TypeTag::Time => "time",
            TypeTag::Date => "date",
            TypeTag::DateTime => "dateTime",
            TypeTag::DateRange => "dateRange",
            TypeTag::DateTimeRange => "dateTimeRange",
            TypeTag::Boolean => "boolean",
            TypeTag::ScheduleRecord => "scheduleRecord",
            TypeTag::TimeRecord => "timeRecord",
            TypeTag::EmployeeAttribute => "employeeAttribute",
            TypeTag::LdRecord => "ldRecord",
            TypeTag::TorDetailRecord => "torDetailRecord",
            TypeTag::ResultSet => "resultSet",
            TypeTag::TimeRecordGroup => "timeRecordGroup",
            TypeTag::Exception => "exception",
            TypeTag::Day => "day",
            TypeTag::Week => "week",
            TypeTag::Period => "period",
            TypeTag::Null => "null",
            TypeTag::Undefined => "undefined",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A statically evaluated value. `None` payloads mean the type is known but
/// the value is not.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    Number(Option<f64>),
    String(Option<String>),
    Boolean(Option<bool>),
    Date(Option<Date>),
    Time(Option<Clock>),
    DateTime,
    DateRange,
    DateTimeRange,
    /// A value of a host-provided type such as a schedule record.
    Opaque(TypeTag),
    Variable(Box<Variable>),
    /// Unresolved; carries the span of the expression that produced it.
    Undefined(Span),
}

impl Object {
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Object::Number(_) => TypeTag::Number,
            Object::String(_) => TypeTag::String,
            Object::Boolean(_) => TypeTag::Boolean,
            Object::Date(_) => TypeTag::Date,
            Object::Time(_) => TypeTag::Time,
            Object::DateTime => TypeTag::DateTime,
            Object::DateRange => TypeTag::DateRange,
            Object::DateTimeRange => TypeTag::DateTimeRange,
            Object::Opaque(tag) => *tag,
            Object::Variable(var) => var.type_tag(),
            Object::Undefined(_) => TypeTag::Undefined,
        }
    }

    /// A non-literal object of the given type.
    pub fn of_type(tag: TypeTag, span: Span) -> Object {
        match tag {
            TypeTag::Number => Object::Number(None),
            TypeTag::String => Object::String(None),
            TypeTag::Boolean => Object::Boolean(None),
            TypeTag::Date => Object::Date(None),
            TypeTag::Time => Object::Time(None),
            TypeTag::DateTime => Object::DateTime,
            TypeTag::DateRange => Object::DateRange,
            TypeTag::DateTimeRange => Object::DateTimeRange,
            TypeTag::Undefined => Object::Undefined(span),
            other => Object::Opaque(other),
        }
    }

    /// True when the value itself is known, not only its type.
    pub fn is_static(&self) -> bool {
        match self {
            Object::Number(v) => v.is_some(),
            Object::String(v) => v.is_some(),
            Object::Boolean(v) => v.is_some(),
            Object::Date(v) => v.is_some(),
            Object::Time(v) => v.is_some(),
            Object::Variable(var) => var.value.is_static(),
            _ => false,
        }
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Object::Number(Some(v)) => write!(f, "{}", v),
            Object::String(Some(v)) => write!(f, "\"{}\"", v),
            Object::Boolean(Some(v)) => write!(f, "{}", v),
            Object::Date(Some(v)) => write!(f, "{}", v),
            Object::Time(Some(v)) => write!(f, "{}", v),
            Object::Variable(var) => write!(f, "{}", var),
            other => write!(f, "<{}>", other.type_tag()),
        }
    }
}

/// A declared variable and the binding that introduced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub binding: VarBinding,
    pub value: Object,
}

impl Variable {
    pub fn type_tag(&self) -> TypeTag {
        self.value.type_tag()
    }

    pub fn name_span(&self) -> Span {
        self.binding.name.span()
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "var {}: {}", self.name, self.type_tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names_are_camel_case() {
        assert_eq!(TypeTag::DateTimeRange.to_string(), "dateTimeRange");
        assert_eq!(TypeTag::LdRecord.as_str(), "ldRecord");
    }

    #[test]
    fn test_of_type_keeps_tag() {
        let span = Span::default();
        for tag in [
            TypeTag::Number,
            TypeTag::Date,
            TypeTag::DateTimeRange,
            TypeTag::ScheduleRecord,
            TypeTag::Period,
        ] {
            let object = Object::of_type(tag, span);
            assert_eq!(object.type_tag(), tag);
            assert!(!object.is_static());
        }
    }

    #[test]
    fn test_display_shows_static_values() {
        assert_eq!(Object::Number(Some(1.5)).to_string(), "1.5");
        assert_eq!(Object::String(None).to_string(), "<string>");
    }
}
