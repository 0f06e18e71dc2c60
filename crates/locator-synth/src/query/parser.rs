//! Recursive-descent parser for the path-query dialect

use crate::errors::QueryError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PathExpr {
    /// `/a/b`, `//a[1]`, `a/b`
    Location(Vec<Step>),
    /// `(path)[n]/more`
    Filter {
        inner: Box<PathExpr>,
        predicates: Vec<Predicate>,
        steps: Vec<Step>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Step {
    /// Preceded by `//`
    pub descendant: bool,
    pub kind: StepKind,
    pub predicates: Vec<Predicate>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StepKind {
    Element(NodeTest),
    SelfNode,
    Parent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum NodeTest {
    Any,
    Name(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Predicate {
    Position(usize),
    Last,
    Condition(Condition),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Condition {
    HasAttr(String),
    AttrEquals {
        name: String,
        value: String,
        negate: bool,
    },
    Contains {
        name: String,
        value: String,
    },
    StartsWith {
        name: String,
        value: String,
    },
    Not(Box<Condition>),
    And(Box<Condition>, Box<Condition>),
    Or(Box<Condition>, Box<Condition>),
}

pub(crate) fn parse(source: &str) -> Result<PathExpr, QueryError> {
    let mut parser = Parser { src: source, pos: 0 };
    parser.skip_ws();
    if parser.at_end() {
        return Err(QueryError::Empty);
    }
    let expr = parser.path_expr()?;
    parser.skip_ws();
    match parser.peek() {
        None => Ok(expr),
        Some(found) => Err(QueryError::UnexpectedChar {
            found,
            offset: parser.pos,
        }),
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn eat(&mut self, token: &str) -> bool {
        self.skip_ws();
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    /// Like `eat`, but the keyword must not run into a following name char
    fn eat_keyword(&mut self, keyword: &str) -> bool {
        self.skip_ws();
        let rest = self.rest();
        if !rest.starts_with(keyword) {
            return false;
        }
        if rest[keyword.len()..].chars().next().is_some_and(is_name_char) {
            return false;
        }
        self.pos += keyword.len();
        true
    }

    fn expect(&mut self, token: &'static str) -> Result<(), QueryError> {
        if self.eat(token) {
            return Ok(());
        }
        match self.peek() {
            None => Err(QueryError::UnexpectedEnd { expected: token }),
            Some(_) => Err(QueryError::Expected {
                expected: token,
                offset: self.pos,
            }),
        }
    }

    fn error_here(&self, expected: &'static str) -> QueryError {
        match self.peek() {
            None => QueryError::UnexpectedEnd { expected },
            Some(_) => QueryError::Expected {
                expected,
                offset: self.pos,
            },
        }
    }

    fn path_expr(&mut self) -> Result<PathExpr, QueryError> {
        if self.eat("(") {
            let inner = self.path_expr()?;
            self.expect(")")?;
            let predicates = self.predicates()?;
            let steps = self.continuation()?;
            return Ok(PathExpr::Filter {
                inner: Box::new(inner),
                predicates,
                steps,
            });
        }

        let mut steps = Vec::new();
        if self.eat("//") {
            steps.push(self.step(true)?);
        } else if self.eat("/") {
            self.skip_ws();
            if self.at_end() || self.peek() == Some(')') {
                return Ok(PathExpr::Location(steps));
            }
            steps.push(self.step(false)?);
        } else {
            steps.push(self.step(false)?);
        }
        steps.extend(self.continuation()?);
        Ok(PathExpr::Location(steps))
    }

    fn continuation(&mut self) -> Result<Vec<Step>, QueryError> {
        let mut steps = Vec::new();
        loop {
            if self.eat("//") {
                steps.push(self.step(true)?);
            } else if self.eat("/") {
                steps.push(self.step(false)?);
            } else {
                return Ok(steps);
            }
        }
    }

    fn step(&mut self, descendant: bool) -> Result<Step, QueryError> {
        self.skip_ws();
        let kind = if self.eat("..") {
            StepKind::Parent
        } else if self.eat(".") {
            StepKind::SelfNode
        } else if self.eat("*") {
            StepKind::Element(NodeTest::Any)
        } else {
            let name = self.name().ok_or_else(|| self.error_here("step"))?;
            StepKind::Element(NodeTest::Name(name))
        };
        let predicates = self.predicates()?;
        Ok(Step {
            descendant,
            kind,
            predicates,
        })
    }

    fn name(&mut self) -> Option<String> {
        self.skip_ws();
        let start = self.pos;
        match self.peek() {
            Some(ch) if ch.is_alphabetic() || ch == '_' => {}
            _ => return None,
        }
        while self.peek().is_some_and(is_name_char) {
            self.bump();
        }
        Some(self.src[start..self.pos].to_string())
    }

    fn predicates(&mut self) -> Result<Vec<Predicate>, QueryError> {
        let mut predicates = Vec::new();
        while self.eat("[") {
            predicates.push(self.predicate()?);
            self.expect("]")?;
        }
        Ok(predicates)
    }

    fn predicate(&mut self) -> Result<Predicate, QueryError> {
        self.skip_ws();
        if self.peek().is_some_and(|ch| ch.is_ascii_digit()) {
            let start = self.pos;
            while self.peek().is_some_and(|ch| ch.is_ascii_digit()) {
                self.bump();
            }
            let digits = &self.src[start..self.pos];
            return match digits.parse::<usize>() {
                Ok(position) if position > 0 => Ok(Predicate::Position(position)),
                _ => Err(QueryError::InvalidPosition(digits.to_string())),
            };
        }
        let checkpoint = self.pos;
        if self.eat_keyword("last") && self.eat("(") && self.eat(")") {
            self.skip_ws();
            if self.peek() == Some(']') {
                return Ok(Predicate::Last);
            }
        }
        self.pos = checkpoint;
        Ok(Predicate::Condition(self.or_condition()?))
    }

    fn or_condition(&mut self) -> Result<Condition, QueryError> {
        let mut left = self.and_condition()?;
        while self.eat_keyword("or") {
            let right = self.and_condition()?;
            left = Condition::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn and_condition(&mut self) -> Result<Condition, QueryError> {
        let mut left = self.unary_condition()?;
        while self.eat_keyword("and") {
            let right = self.unary_condition()?;
            left = Condition::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn unary_condition(&mut self) -> Result<Condition, QueryError> {
        if self.eat("(") {
            let inner = self.or_condition()?;
            self.expect(")")?;
            return Ok(inner);
        }
        if self.eat("@") {
            let name = self.name().ok_or_else(|| self.error_here("attribute name"))?;
            if self.eat("!=") {
                let value = self.literal()?;
                return Ok(Condition::AttrEquals {
                    name,
                    value,
                    negate: true,
                });
            }
            if self.eat("=") {
                let value = self.literal()?;
                return Ok(Condition::AttrEquals {
                    name,
                    value,
                    negate: false,
                });
            }
            return Ok(Condition::HasAttr(name));
        }

        let function = self.name().ok_or_else(|| self.error_here("condition"))?;
        self.expect("(")?;
        let condition = match function.as_str() {
            "not" => Condition::Not(Box::new(self.or_condition()?)),
            "contains" | "starts-with" => {
                self.expect("@")?;
                let name = self.name().ok_or_else(|| self.error_here("attribute name"))?;
                self.expect(",")?;
                let value = self.literal()?;
                if function == "contains" {
                    Condition::Contains { name, value }
                } else {
                    Condition::StartsWith { name, value }
                }
            }
            _ => return Err(QueryError::UnsupportedFunction(function)),
        };
        self.expect(")")?;
        Ok(condition)
    }

    fn literal(&mut self) -> Result<String, QueryError> {
        self.skip_ws();
        let start = self.pos;
        let quote = match self.peek() {
            Some(quote @ ('"' | '\'')) => quote,
            _ => return Err(self.error_here("string literal")),
        };
        self.bump();
        let body_start = self.pos;
        match self.rest().find(quote) {
            Some(len) => {
                self.pos += len;
                let value = self.src[body_start..self.pos].to_string();
                self.bump();
                Ok(value)
            }
            None => Err(QueryError::UnterminatedLiteral(start)),
        }
    }
}

fn is_name_char(ch: char) -> bool {
    ch.is_alphanumeric() || matches!(ch, '_' | '-' | '.' | ':')
}
