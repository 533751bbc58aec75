//! Static evaluator
//!
//! One depth-first pass over a parsed program. It records every var binding
//! (including bindings nested inside call arguments and parenthesized blocks)
//! in source order and labels expressions with what can be known about them
//! without data: literal values, the declared object behind an identifier, and
//! the return type of builtin calls. Anything else is [`Object::Undefined`].

use crate::ast::{BlockExpr, Expression, Program, Statement, VarBinding};
use crate::builtins;
use crate::object::{Object, Variable};

/// Result of evaluating a program.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Object of the last statement, `None` for an empty program.
    pub value: Option<Object>,
    pub variables: Vec<Variable>,
}

pub fn evaluate(program: &Program) -> Evaluation {
    let mut evaluator = Evaluator::default();
    let mut value = None;
    for statement in &program.statements {
        match statement {
            Statement::Expression(stmt) => value = Some(evaluator.expression(&stmt.expression)),
            Statement::Var(binding) => value = Some(evaluator.binding(binding)),
            Statement::LineComment(_) | Statement::BlockComment(_) => {}
        }
    }
    Evaluation {
        value,
        variables: evaluator.variables,
    }
}

#[derive(Default)]
struct Evaluator {
    variables: Vec<Variable>,
}

impl Evaluator {
    fn binding(&mut self, binding: &VarBinding) -> Object {
        let value = self.expression(&binding.value);
        let variable = Variable {
            name: binding.name.name.clone(),
            binding: binding.clone(),
            value,
        };
        self.variables.push(variable.clone());
        Object::Variable(Box::new(variable))
    }

    fn block(&mut self, block: &BlockExpr) -> Object {
        for var in &block.vars {
            self.binding(var);
        }
        self.expression(&block.value)
    }

    fn lookup(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().rev().find(|var| var.name == name)
    }

    fn expression(&mut self, expr: &Expression) -> Object {
        let undefined = Object::Undefined(expr.span());
        match expr {
            Expression::Number(lit) => Object::Number(Some(lit.value)),
            Expression::String(lit) => Object::String(Some(lit.value().to_string())),
            Expression::Boolean(lit) => Object::Boolean(Some(lit.value)),
            Expression::Date(lit) => Object::Date(Some(lit.date)),
            Expression::Time(lit) => Object::Time(Some(lit.clock)),
            Expression::Ident(ident) => match self.lookup(&ident.name) {
                Some(var) => Object::Variable(Box::new(var.clone())),
                None => undefined,
            },
            Expression::Paren(paren) => self.block(&paren.inner),
            Expression::Block(block) => self.block(block),
            Expression::BuiltinCall(call) => {
                for arg in &call.args {
                    self.expression(arg);
                }
                match builtins::lookup(&call.name) {
                    Some(function) => Object::of_type(function.return_type, expr.span()),
                    None => undefined,
                }
            }
            Expression::Prefix(prefix) => {
                self.expression(&prefix.right);
                undefined
            }
            Expression::Infix(infix) => {
                self.expression(&infix.left);
                self.expression(&infix.right);
                undefined
            }
            Expression::Macro(mac) => {
                for arg in &mac.args {
                    self.expression(arg);
                }
                undefined
            }
            Expression::Over(over) => {
                self.expression(&over.context);
                undefined
            }
            Expression::Where(clause) => {
                self.expression(&clause.condition);
                undefined
            }
            Expression::OrderBy(order) => {
                self.expression(&order.expr);
                undefined
            }
            Expression::In(in_expr) => {
                self.expression(&in_expr.left);
                undefined
            }
            Expression::Blank(_)
            | Expression::Alias(_)
            | Expression::Set(_)
            | Expression::List(_)
            | Expression::Error(_) => undefined,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::TypeTag;
    use crate::parser::parse;

    fn eval(source: &str) -> Evaluation {
        let output = parse(source);
        assert!(output.errors.is_empty(), "{:?}", output.errors);
        evaluate(&output.program)
    }

    #[test]
    fn test_var_binding_is_recorded() {
        let evaluation = eval("var x = 1;\nx * 42");
        assert_eq!(evaluation.variables.len(), 1);
        let var = &evaluation.variables[0];
        assert_eq!(var.name, "x");
        assert_eq!(var.value, Object::Number(Some(1.0)));
        assert_eq!(var.to_string(), "var x: number");
        assert_eq!(
            evaluation.value.map(|v| v.type_tag()),
            Some(TypeTag::Undefined)
        );
    }

    #[test]
    fn test_literals_are_static() {
        let evaluation = eval("var s = \"abc\"; var b = true; var d = {2020-02-02}; var t = {08:30};");
        let tags: Vec<_> = evaluation.variables.iter().map(|v| v.type_tag()).collect();
        assert_eq!(
            tags,
            vec![TypeTag::String, TypeTag::Boolean, TypeTag::Date, TypeTag::Time]
        );
        assert!(evaluation.variables.iter().all(|v| v.value.is_static()));
    }

    #[test]
    fn test_identifier_resolves_to_earlier_variable() {
        let evaluation = eval("var a = 2;\nvar b = a;\nb");
        let Some(Object::Variable(var)) = evaluation.value else {
            panic!("expected variable object");
        };
        assert_eq!(var.name, "b");
        assert_eq!(var.type_tag(), TypeTag::Number);
    }

    #[test]
    fn test_unknown_identifier_is_undefined() {
        let evaluation = eval("hours");
        assert!(matches!(evaluation.value, Some(Object::Undefined(_))));
    }

    #[test]
    fn test_nested_bindings_are_collected_in_order() {
        let evaluation = eval("var outer = 1;\nmax(var inner = 2; inner, (var deep = 3; deep))");
        let names: Vec<_> = evaluation.variables.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["outer", "inner", "deep"]);
    }

    #[test]
    fn test_builtin_calls_take_return_type() {
        let evaluation = eval("makeDate(2020, 1, 1)");
        assert_eq!(evaluation.value, Some(Object::Date(None)));
        let evaluation = eval("var r = findFirstSchedule(over period);");
        assert_eq!(evaluation.variables[0].type_tag(), TypeTag::ScheduleRecord);
    }

    #[test]
    fn test_evaluation_is_reproducible() {
        let output = parse("var x = 1; sum(over day, x)");
        assert_eq!(evaluate(&output.program), evaluate(&output.program));
    }
}
