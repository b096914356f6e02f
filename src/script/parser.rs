use super::lexer::{Lexeme, Token};
use super::ScriptError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Equal,
    NotEqual,
    Greater,
    Less,
    GreaterEqual,
    LessEqual,
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq)]
pub(super) enum Expression {
    Number(f64),
    Text(String),
    Boolean(bool),
    Variable(String, usize),
    Not(Box<Expression>),
    Negate(Box<Expression>),
    Binary {
        operator: Operator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Conditional {
        condition: Box<Expression>,
        then: Box<Expression>,
        otherwise: Box<Expression>,
    },
    Call {
        function: String,
        arguments: Vec<Expression>,
        line: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub(super) enum Statement {
    Let(String, Expression),
    Expression(Expression),
}

const BP_CONDITIONAL: u8 = 1;
const BP_OR: u8 = 2;
const BP_AND: u8 = 3;
const BP_EQUALITY: u8 = 4;
const BP_COMPARISON: u8 = 5;
const BP_ADDITIVE: u8 = 6;
const BP_MULTIPLICATIVE: u8 = 7;
const BP_UNARY: u8 = 8;

fn infix_bp(token: &Token) -> Option<(u8, u8)> {
    match token {
        Token::Question => Some((BP_CONDITIONAL, BP_CONDITIONAL)),
        Token::PipePipe => Some((BP_OR, BP_OR + 1)),
        Token::AmpAmp => Some((BP_AND, BP_AND + 1)),
        Token::EqEq | Token::BangEq => Some((BP_EQUALITY, BP_EQUALITY + 1)),
        Token::Gt | Token::Lt | Token::GtEq | Token::LtEq => Some((BP_COMPARISON, BP_COMPARISON + 1)),
        Token::Plus | Token::Minus => Some((BP_ADDITIVE, BP_ADDITIVE + 1)),
        Token::Star | Token::Slash | Token::Percent => {
            Some((BP_MULTIPLICATIVE, BP_MULTIPLICATIVE + 1))
        }
        _ => None,
    }
}

fn operator(token: &Token) -> Option<Operator> {
    let operator = match token {
        Token::Plus => Operator::Add,
        Token::Minus => Operator::Subtract,
        Token::Star => Operator::Multiply,
        Token::Slash => Operator::Divide,
        Token::Percent => Operator::Modulo,
        Token::EqEq => Operator::Equal,
        Token::BangEq => Operator::NotEqual,
        Token::Gt => Operator::Greater,
        Token::Lt => Operator::Less,
        Token::GtEq => Operator::GreaterEqual,
        Token::LtEq => Operator::LessEqual,
        Token::AmpAmp => Operator::And,
        Token::PipePipe => Operator::Or,
        _ => return None,
    };
    Some(operator)
}

pub(super) struct Parser {
    tokens: Vec<Lexeme>,
    position: usize,
}

impl Parser {
    pub(super) fn new(tokens: Vec<Lexeme>) -> Parser {
        Parser {
            tokens,
            position: 0,
        }
    }

    /// Parse a sequence of statements separated by `;` or newlines.
    pub(super) fn parse_program(&mut self) -> Result<Vec<Statement>, ScriptError> {
        let mut statements = Vec::new();

        loop {
            while self.peek() == Some(&Token::Semi) {
                self.advance();
            }
            if self.at_end() {
                break;
            }

            statements.push(self.parse_statement()?);

            match self.peek() {
                None | Some(Token::Semi) => {}
                Some(_) => return Err(self.error("unexpected tokens after expression")),
            }
        }

        Ok(statements)
    }

    fn parse_statement(&mut self) -> Result<Statement, ScriptError> {
        if self.peek() == Some(&Token::Let) {
            self.advance();
            let name = match self.advance() {
                Some(Token::Ident(name)) => name,
                _ => return Err(self.error("expected a name after 'let'")),
            };
            self.expect(Token::Eq, "expected '=' in assignment")?;
            let value = self.parse_expr(0)?;
            return Ok(Statement::Let(name, value));
        }
        Ok(Statement::Expression(self.parse_expr(0)?))
    }

    pub(super) fn parse_expr(&mut self, min_bp: u8) -> Result<Expression, ScriptError> {
        let mut left = self.parse_prefix()?;

        loop {
            let Some(token) = self.peek() else { break };
            let Some((l_bp, r_bp)) = infix_bp(token) else { break };

            if l_bp < min_bp {
                break;
            }

            // conditional operator takes two further operands
            if token == &Token::Question {
                self.advance();
                let then = self.parse_expr(0)?;
                self.expect(Token::Colon, "expected ':' in conditional")?;
                let otherwise = self.parse_expr(r_bp)?;
                left = Expression::Conditional {
                    condition: Box::new(left),
                    then: Box::new(then),
                    otherwise: Box::new(otherwise),
                };
                continue;
            }

            let operator = match self
                .advance()
                .as_ref()
                .and_then(operator)
            {
                Some(operator) => operator,
                None => return Err(self.error("unexpected infix operator")),
            };
            let right = self.parse_expr(r_bp)?;

            left = Expression::Binary {
                operator,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_prefix(&mut self) -> Result<Expression, ScriptError> {
        let line = self.line();
        let token = self
            .advance()
            .ok_or_else(|| self.error("unexpected end of expression"))?;

        match token {
            Token::Number(n) => Ok(Expression::Number(n)),
            Token::Text(s) => Ok(Expression::Text(s)),
            Token::True => Ok(Expression::Boolean(true)),
            Token::False => Ok(Expression::Boolean(false)),

            Token::Ident(name) => {
                if self.peek() == Some(&Token::LParen) {
                    self.advance();
                    let arguments = self.parse_arguments()?;
                    Ok(Expression::Call {
                        function: name,
                        arguments,
                        line,
                    })
                } else {
                    Ok(Expression::Variable(name, line))
                }
            }

            Token::Bang => {
                let operand = self.parse_expr(BP_UNARY)?;
                Ok(Expression::Not(Box::new(operand)))
            }
            Token::Minus => {
                let operand = self.parse_expr(BP_UNARY)?;
                Ok(Expression::Negate(Box::new(operand)))
            }

            Token::LParen => {
                let expr = self.parse_expr(0)?;
                self.expect(Token::RParen, "expected ')'")?;
                Ok(expr)
            }

            other => Err(ScriptError::new(
                line,
                format!("unexpected {:?}", other).to_lowercase(),
            )),
        }
    }

    fn parse_arguments(&mut self) -> Result<Vec<Expression>, ScriptError> {
        let mut arguments = Vec::new();
        if self.peek() == Some(&Token::RParen) {
            self.advance();
            return Ok(arguments);
        }

        loop {
            arguments.push(self.parse_expr(0)?);
            match self.advance() {
                Some(Token::Comma) => continue,
                Some(Token::RParen) => break,
                _ => return Err(self.error("expected ',' or ')' in argument list")),
            }
        }

        Ok(arguments)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens
            .get(self.position)
            .map(|l| &l.token)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self
            .tokens
            .get(self.position)
            .map(|l| {
                l.token
                    .clone()
            });
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    fn expect(&mut self, expected: Token, message: &str) -> Result<(), ScriptError> {
        match self.advance() {
            Some(token) if token == expected => Ok(()),
            _ => Err(self.error(message)),
        }
    }

    fn at_end(&self) -> bool {
        self.position
            >= self
                .tokens
                .len()
    }

    /// Line of the current token, or of the last one once input runs out.
    fn line(&self) -> usize {
        self.tokens
            .get(self.position)
            .or_else(|| {
                self.tokens
                    .last()
            })
            .map(|l| l.line)
            .unwrap_or(1)
    }

    fn error(&self, message: &str) -> ScriptError {
        ScriptError::new(self.line(), message)
    }
}
