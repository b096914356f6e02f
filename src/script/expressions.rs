use std::collections::HashMap;

use tracing::debug;

use super::lexer::tokenize;
use super::parser::{Expression, Operator, Parser, Statement};
use super::{Evaluator, Keys, ScriptError, Value};

/// The built-in expression language.
///
/// Names resolve first to values bound with `let` or [`Evaluator::bind`],
/// then to the scope keys visible to the caller.
#[derive(Debug, Default)]
pub struct Expressions {
    bindings: HashMap<String, Value>,
}

impl Expressions {
    pub fn new() -> Expressions {
        Expressions::default()
    }
}

impl Evaluator for Expressions {
    fn bind(&mut self, name: &str, value: &str) {
        self.bindings
            .insert(name.to_string(), Value::Text(value.to_string()));
    }

    fn evaluate(&mut self, location: &str, code: &str, keys: &dyn Keys) -> Result<String, ScriptError> {
        debug!("evaluating code from {}", location);

        let tokens = tokenize(code)?;
        let program = Parser::new(tokens).parse_program()?;

        let mut frame = Frame {
            locals: HashMap::new(),
            bindings: &self.bindings,
            keys,
        };

        let mut result = Value::Nothing;
        for statement in &program {
            match statement {
                Statement::Let(name, expression) => {
                    let value = frame.evaluate(expression)?;
                    frame
                        .locals
                        .insert(name.clone(), value);
                    result = Value::Nothing;
                }
                Statement::Expression(expression) => {
                    result = frame.evaluate(expression)?;
                }
            }
        }

        Ok(result.to_string())
    }
}

/// Variables in play for one evaluation.
struct Frame<'a> {
    locals: HashMap<String, Value>,
    bindings: &'a HashMap<String, Value>,
    keys: &'a dyn Keys,
}

impl Frame<'_> {
    fn lookup(&self, name: &str) -> Option<Value> {
        if let Some(value) = self
            .locals
            .get(name)
        {
            return Some(value.clone());
        }
        if let Some(value) = self
            .bindings
            .get(name)
        {
            return Some(value.clone());
        }
        self.keys
            .value(name)
            .map(Value::Text)
    }

    fn evaluate(&self, expression: &Expression) -> Result<Value, ScriptError> {
        match expression {
            Expression::Number(n) => Ok(Value::Number(*n)),
            Expression::Text(s) => Ok(Value::Text(s.clone())),
            Expression::Boolean(b) => Ok(Value::Boolean(*b)),
            Expression::Variable(name, line) => self
                .lookup(name)
                .ok_or_else(|| ScriptError::new(*line, format!("'{}' is not defined", name))),
            Expression::Not(operand) => Ok(Value::Boolean(
                !self
                    .evaluate(operand)?
                    .is_truthy(),
            )),
            Expression::Negate(operand) => {
                let value = self.evaluate(operand)?;
                match value.as_number() {
                    Some(n) => Ok(Value::Number(-n)),
                    None => Err(ScriptError::new(
                        line_of(operand),
                        format!("cannot negate {}", value.type_name()),
                    )),
                }
            }
            Expression::Binary {
                operator,
                left,
                right,
            } => self.binary(*operator, left, right),
            Expression::Conditional {
                condition,
                then,
                otherwise,
            } => {
                if self
                    .evaluate(condition)?
                    .is_truthy()
                {
                    self.evaluate(then)
                } else {
                    self.evaluate(otherwise)
                }
            }
            Expression::Call {
                function,
                arguments,
                line,
            } => {
                let mut values = Vec::with_capacity(arguments.len());
                for argument in arguments {
                    values.push(self.evaluate(argument)?);
                }
                self.call(function, &values, *line)
            }
        }
    }

    fn binary(&self, operator: Operator, left: &Expression, right: &Expression) -> Result<Value, ScriptError> {
        // short circuit
        match operator {
            Operator::And => {
                let l = self.evaluate(left)?;
                if !l.is_truthy() {
                    return Ok(Value::Boolean(false));
                }
                return Ok(Value::Boolean(
                    self.evaluate(right)?
                        .is_truthy(),
                ));
            }
            Operator::Or => {
                let l = self.evaluate(left)?;
                if l.is_truthy() {
                    return Ok(Value::Boolean(true));
                }
                return Ok(Value::Boolean(
                    self.evaluate(right)?
                        .is_truthy(),
                ));
            }
            _ => {}
        }

        let l = self.evaluate(left)?;
        let r = self.evaluate(right)?;
        let line = line_of(left);

        match operator {
            Operator::Add => match (&l, &r) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                _ => Ok(Value::Text(format!("{}{}", l, r))),
            },
            Operator::Subtract | Operator::Multiply | Operator::Divide | Operator::Modulo => {
                let (Some(a), Some(b)) = (l.as_number(), r.as_number()) else {
                    return Err(ScriptError::new(
                        line,
                        format!(
                            "arithmetic on {} and {}",
                            l.type_name(),
                            r.type_name()
                        ),
                    ));
                };
                let result = match operator {
                    Operator::Subtract => a - b,
                    Operator::Multiply => a * b,
                    _ if b == 0.0 => return Err(ScriptError::new(line, "division by zero")),
                    Operator::Divide => a / b,
                    _ => a % b,
                };
                Ok(Value::Number(result))
            }
            Operator::Equal => Ok(Value::Boolean(equal(&l, &r))),
            Operator::NotEqual => Ok(Value::Boolean(!equal(&l, &r))),
            Operator::Greater | Operator::Less | Operator::GreaterEqual | Operator::LessEqual => {
                let ordering = match (&l, &r) {
                    (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
                    _ => Some(
                        l.to_string()
                            .cmp(&r.to_string()),
                    ),
                };
                let Some(ordering) = ordering else {
                    return Ok(Value::Boolean(false));
                };
                let result = match operator {
                    Operator::Greater => ordering.is_gt(),
                    Operator::Less => ordering.is_lt(),
                    Operator::GreaterEqual => ordering.is_ge(),
                    _ => ordering.is_le(),
                };
                Ok(Value::Boolean(result))
            }
            Operator::And | Operator::Or => Ok(Value::Nothing),
        }
    }

    fn call(&self, function: &str, arguments: &[Value], line: usize) -> Result<Value, ScriptError> {
        let text = |n: usize| -> Result<String, ScriptError> {
            arguments
                .get(n)
                .map(|v| v.to_string())
                .ok_or_else(|| {
                    ScriptError::new(
                        line,
                        format!("{}() requires {} argument{}", function, n + 1, if n == 0 { "" } else { "s" }),
                    )
                })
        };

        let result = match function {
            "upper" => Value::Text(text(0)?.to_uppercase()),
            "lower" => Value::Text(text(0)?.to_lowercase()),
            "trim" => Value::Text(
                text(0)?
                    .trim()
                    .to_string(),
            ),
            "len" => Value::Number(
                text(0)?
                    .chars()
                    .count() as f64,
            ),
            "replace" => Value::Text(text(0)?.replace(&text(1)?, &text(2)?)),
            "repeat" => {
                let count = arguments
                    .get(1)
                    .and_then(Value::as_number)
                    .ok_or_else(|| ScriptError::new(line, "repeat() requires a count"))?;
                Value::Text(text(0)?.repeat(count.max(0.0) as usize))
            }
            "concat" => Value::Text(
                arguments
                    .iter()
                    .map(|v| v.to_string())
                    .collect(),
            ),
            "literal" | "str" => Value::Text(text(0)?),
            "num" => {
                let value = text(0)?;
                match value
                    .trim()
                    .parse::<f64>()
                {
                    Ok(n) => Value::Number(n),
                    Err(_) => return Err(ScriptError::new(line, format!("'{}' is not a number", value))),
                }
            }
            "defined" => {
                let key = text(0)?;
                let found = self
                    .keys
                    .value(&key)
                    .map(|v| !v.is_empty())
                    .unwrap_or(false);
                Value::Boolean(found)
            }
            "value" => Value::Text(
                self.keys
                    .value(&text(0)?)
                    .unwrap_or_default(),
            ),
            _ => {
                return Err(ScriptError::new(
                    line,
                    format!("unknown function '{}'", function),
                ))
            }
        };

        Ok(result)
    }
}

fn equal(l: &Value, r: &Value) -> bool {
    match (l, r) {
        (Value::Number(a), Value::Number(b)) => a == b,
        (Value::Boolean(a), Value::Boolean(b)) => a == b,
        _ => l.to_string() == r.to_string(),
    }
}

/// Best-effort line for an expression, used when an error is raised about
/// an operand rather than a token.
fn line_of(expression: &Expression) -> usize {
    match expression {
        Expression::Variable(_, line) => *line,
        Expression::Call { line, .. } => *line,
        Expression::Not(e) | Expression::Negate(e) => line_of(e),
        Expression::Binary { left, .. } => line_of(left),
        Expression::Conditional { condition, .. } => line_of(condition),
        _ => 1,
    }
}

#[cfg(test)]
mod check {
    use super::*;

    fn run(code: &str) -> Result<String, ScriptError> {
        let keys: HashMap<String, String> = [("colour".to_string(), "blue".to_string())]
            .into_iter()
            .collect();
        Expressions::new().evaluate("test", code, &keys)
    }

    #[test]
    fn arithmetic() {
        assert_eq!(run("1 + 2 * 3").unwrap(), "7");
        assert_eq!(run("(1 + 2) * 3").unwrap(), "9");
        assert_eq!(run("7 / 2").unwrap(), "3.5");
        assert_eq!(run("-4 + 1").unwrap(), "-3");
        assert_eq!(run("'a' + 1").unwrap(), "a1");
    }

    #[test]
    fn logic_and_comparison() {
        assert_eq!(run("1 < 2 && 'b' > 'a'").unwrap(), "true");
        assert_eq!(run("!(1 == 1) || false").unwrap(), "false");
        assert_eq!(run("3 == 3 ? 'yes' : 'no'").unwrap(), "yes");
        assert_eq!(run("'x' != 'x'").unwrap(), "false");
    }

    #[test]
    fn statements_and_bindings() {
        assert_eq!(run("let a = 2; let b = a * 5\nb + 1").unwrap(), "11");

        let mut evaluator = Expressions::new();
        evaluator.bind("text", "hello");
        let keys: HashMap<String, String> = HashMap::new();
        assert_eq!(
            evaluator
                .evaluate("test", "upper(text)", &keys)
                .unwrap(),
            "HELLO"
        );
    }

    #[test]
    fn keys_are_visible() {
        assert_eq!(run("colour").unwrap(), "blue");
        assert_eq!(run("defined('colour')").unwrap(), "true");
        assert_eq!(run("defined('size')").unwrap(), "false");
        assert_eq!(run("value('size')").unwrap(), "");
    }

    #[test]
    fn builtins() {
        assert_eq!(run("replace('a-b-c', '-', '+')").unwrap(), "a+b+c");
        assert_eq!(run("repeat('ab', 3)").unwrap(), "ababab");
        assert_eq!(run("concat('a', 1, true)").unwrap(), "a1true");
        assert_eq!(run("len(trim('  abc '))").unwrap(), "3");
        assert_eq!(run("num('4') + 1").unwrap(), "5");
    }

    #[test]
    fn errors_carry_line() {
        let error = run("let a = 1\n\nmissing + a").unwrap_err();
        assert_eq!(error.line, 3);
        assert_eq!(error.message, "'missing' is not defined");

        let error = run("nosuch(1)").unwrap_err();
        assert_eq!(error.message, "unknown function 'nosuch'");

        let error = run("1 / 0").unwrap_err();
        assert_eq!(error.message, "division by zero");
    }
}
