//! Parser for Cool
//!
//! Recursive descent over the token stream. The precedence ladder follows
//! the Cool manual (tightest first): dispatch `.`/`@`, `~`, `isvoid`,
//! `* /`, `+ -`, the non-associative comparisons `< <= =`, `not`, and
//! right-associative assignment `<-`. Multi-binding `let`s are desugared
//! into nested single-binding nodes, and a bare call `f(...)` becomes a
//! dispatch on an explicit `self` receiver.

use crate::frontend::ast::*;
use crate::frontend::intern::{Interner, Symbol};
use crate::frontend::lexer::Lexer;
use crate::frontend::token::{Token, TokenKind};
use crate::utils::{Error, Result, Span};

/// The parser
pub struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    interner: &'a mut Interner,
    /// Interned name of the file being parsed
    file: Symbol,
    /// Interned "self", for implicit dispatch receivers
    sym_self: Symbol,
}

impl<'a> Parser<'a> {
    /// Create a new parser from a lexer
    pub fn new(mut lexer: Lexer, interner: &'a mut Interner, filename: &str) -> Self {
        let file = interner.intern(filename);
        let sym_self = interner.intern("self");
        Self {
            tokens: lexer.tokenize(),
            pos: 0,
            interner,
            file,
            sym_self,
        }
    }

    // ==================== Helper Methods ====================

    fn current(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or_else(|| {
            self.tokens.last().expect("tokens should not be empty")
        })
    }

    fn current_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos + 1)
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.current_kind()) == std::mem::discriminant(kind)
    }

    fn is_at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    fn prev_span(&self) -> Span {
        self.tokens[self.pos.saturating_sub(1)].span
    }

    fn expect(&mut self, expected: TokenKind) -> Result<Token> {
        if self.check(&expected) {
            Ok(self.advance())
        } else {
            Err(Error::UnexpectedToken {
                expected: format!("{:?}", expected),
                got: format!("{:?}", self.current_kind()),
                span: self.current().span,
            })
        }
    }

    fn consume(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Expect an object identifier and intern it
    fn parse_object_id(&mut self) -> Result<(Symbol, Span)> {
        match self.current_kind().clone() {
            TokenKind::ObjectId(name) => {
                let span = self.current().span;
                self.advance();
                Ok((self.interner.intern(&name), span))
            }
            _ => Err(Error::ExpectedIdent { span: self.current().span }),
        }
    }

    /// Expect a type identifier and intern it
    fn parse_type_id(&mut self) -> Result<(Symbol, Span)> {
        match self.current_kind().clone() {
            TokenKind::TypeId(name) => {
                let span = self.current().span;
                self.advance();
                Ok((self.interner.intern(&name), span))
            }
            _ => Err(Error::ExpectedType { span: self.current().span }),
        }
    }

    // ==================== Parsing Methods ====================

    /// Parse a complete program: one or more `class ... ;`
    pub fn parse_program(&mut self) -> Result<Program> {
        // Lexical damage is fatal before any grammar work starts
        for token in &self.tokens {
            if let TokenKind::Invalid(message) = &token.kind {
                return Err(Error::Lexical {
                    message: message.clone(),
                    span: token.span,
                });
            }
        }

        let start = self.current().span;
        let mut classes = Vec::new();

        while self.check(&TokenKind::Class) {
            classes.push(self.parse_class()?);
        }

        if classes.is_empty() || !self.is_at_end() {
            return Err(Error::UnexpectedToken {
                expected: "class".to_string(),
                got: format!("{:?}", self.current_kind()),
                span: self.current().span,
            });
        }

        Ok(Program {
            classes,
            span: start.merge(&self.prev_span()),
        })
    }

    /// Parse `class TYPE [inherits TYPE] { features } ;`
    fn parse_class(&mut self) -> Result<Class> {
        let start = self.current().span;
        self.expect(TokenKind::Class)?;

        let (name, _) = self.parse_type_id()?;

        let parent = if self.consume(&TokenKind::Inherits) {
            Some(self.parse_type_id()?.0)
        } else {
            None
        };

        self.expect(TokenKind::LBrace)?;
        let mut features = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            features.push(self.parse_feature()?);
            self.expect(TokenKind::Semicolon)?;
        }
        self.expect(TokenKind::RBrace)?;
        self.expect(TokenKind::Semicolon)?;

        Ok(Class {
            name,
            parent,
            filename: self.file,
            features,
            span: start.merge(&self.prev_span()),
        })
    }

    /// Parse a feature; a `(` after the name marks a method
    fn parse_feature(&mut self) -> Result<Feature> {
        let start = self.current().span;
        let (name, _) = self.parse_object_id()?;

        if self.check(&TokenKind::LParen) {
            self.advance();
            let mut formals = Vec::new();
            while !self.check(&TokenKind::RParen) && !self.is_at_end() {
                formals.push(self.parse_formal()?);
                if !self.consume(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect(TokenKind::RParen)?;
            self.expect(TokenKind::Colon)?;
            let (return_type, _) = self.parse_type_id()?;
            self.expect(TokenKind::LBrace)?;
            let body = self.parse_expr()?;
            self.expect(TokenKind::RBrace)?;

            Ok(Feature::Method(Method {
                name,
                formals,
                return_type,
                body,
                span: start.merge(&self.prev_span()),
            }))
        } else {
            self.expect(TokenKind::Colon)?;
            let (declared_type, _) = self.parse_type_id()?;
            let init = if self.consume(&TokenKind::Assign) {
                Some(self.parse_expr()?)
            } else {
                None
            };

            Ok(Feature::Attribute(Attribute {
                name,
                declared_type,
                init,
                span: start.merge(&self.prev_span()),
            }))
        }
    }

    fn parse_formal(&mut self) -> Result<Formal> {
        let start = self.current().span;
        let (name, _) = self.parse_object_id()?;
        self.expect(TokenKind::Colon)?;
        let (declared_type, _) = self.parse_type_id()?;
        Ok(Formal {
            name,
            declared_type,
            span: start.merge(&self.prev_span()),
        })
    }

    // ==================== Expressions ====================

    /// Lowest level: right-associative assignment
    pub fn parse_expr(&mut self) -> Result<Expr> {
        if let TokenKind::ObjectId(name) = self.current_kind().clone() {
            if matches!(self.peek().map(|t| &t.kind), Some(TokenKind::Assign)) {
                let start = self.current().span;
                self.advance(); // identifier
                self.advance(); // <-
                let target = self.interner.intern(&name);
                let value = self.parse_expr()?;
                let span = start.merge(&self.prev_span());
                return Ok(Expr::new(
                    ExprKind::Assign { target, value: Box::new(value) },
                    span,
                ));
            }
        }
        self.parse_not()
    }

    /// `not` binds looser than the comparisons
    fn parse_not(&mut self) -> Result<Expr> {
        if self.check(&TokenKind::Not) {
            let start = self.current().span;
            self.advance();
            let operand = self.parse_not()?;
            let span = start.merge(&self.prev_span());
            return Ok(Expr::new(ExprKind::Not(Box::new(operand)), span));
        }
        self.parse_comparison()
    }

    /// Non-associative `<`, `<=`, `=`
    fn parse_comparison(&mut self) -> Result<Expr> {
        let lhs = self.parse_additive()?;
        let op = match self.current_kind() {
            TokenKind::Lt => BinOp::Lt,
            TokenKind::Le => BinOp::Le,
            TokenKind::Eq => BinOp::Eq,
            _ => return Ok(lhs),
        };
        self.advance();
        let rhs = self.parse_additive()?;
        let span = lhs.span.merge(&rhs.span);
        Ok(Expr::new(
            ExprKind::BinOp { op, lhs: Box::new(lhs), rhs: Box::new(rhs) },
            span,
        ))
    }

    fn parse_additive(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_multiplicative()?;
        loop {
            let op = match self.current_kind() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_multiplicative()?;
            let span = lhs.span.merge(&rhs.span);
            lhs = Expr::new(
                ExprKind::BinOp { op, lhs: Box::new(lhs), rhs: Box::new(rhs) },
                span,
            );
        }
        Ok(lhs)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_isvoid()?;
        loop {
            let op = match self.current_kind() {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_isvoid()?;
            let span = lhs.span.merge(&rhs.span);
            lhs = Expr::new(
                ExprKind::BinOp { op, lhs: Box::new(lhs), rhs: Box::new(rhs) },
                span,
            );
        }
        Ok(lhs)
    }

    /// `isvoid` sits between the multiplicative level and `~`
    fn parse_isvoid(&mut self) -> Result<Expr> {
        if self.check(&TokenKind::Isvoid) {
            let start = self.current().span;
            self.advance();
            let operand = self.parse_isvoid()?;
            let span = start.merge(&self.prev_span());
            return Ok(Expr::new(ExprKind::IsVoid(Box::new(operand)), span));
        }
        self.parse_neg()
    }

    /// `~` binds tightest of the operators
    fn parse_neg(&mut self) -> Result<Expr> {
        if self.check(&TokenKind::Tilde) {
            let start = self.current().span;
            self.advance();
            let operand = self.parse_neg()?;
            let span = start.merge(&self.prev_span());
            return Ok(Expr::new(ExprKind::Neg(Box::new(operand)), span));
        }
        self.parse_postfix()
    }

    /// Dispatch chains: `expr(@TYPE)?.id(args)` applied left to right
    fn parse_postfix(&mut self) -> Result<Expr> {
        let mut expr = self.parse_primary()?;

        loop {
            if self.check(&TokenKind::At) {
                self.advance();
                let (class, _) = self.parse_type_id()?;
                self.expect(TokenKind::Dot)?;
                let (method, _) = self.parse_object_id()?;
                self.expect(TokenKind::LParen)?;
                let args = self.parse_actuals()?;
                let span = expr.span.merge(&self.prev_span());
                expr = Expr::new(
                    ExprKind::StaticDispatch {
                        receiver: Box::new(expr),
                        class,
                        method,
                        args,
                    },
                    span,
                );
            } else if self.check(&TokenKind::Dot) {
                self.advance();
                let (method, _) = self.parse_object_id()?;
                self.expect(TokenKind::LParen)?;
                let args = self.parse_actuals()?;
                let span = expr.span.merge(&self.prev_span());
                expr = Expr::new(
                    ExprKind::Dispatch {
                        receiver: Box::new(expr),
                        method,
                        args,
                    },
                    span,
                );
            } else {
                break;
            }
        }

        Ok(expr)
    }

    /// Parse `expr (',' expr)*` up to the closing paren
    fn parse_actuals(&mut self) -> Result<Vec<Expr>> {
        let mut args = Vec::new();
        while !self.check(&TokenKind::RParen) && !self.is_at_end() {
            args.push(self.parse_expr()?);
            if !self.consume(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(args)
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        let start = self.current().span;

        match self.current_kind().clone() {
            TokenKind::IntConst(text) => {
                self.advance();
                let sym = self.interner.intern(&text);
                Ok(Expr::new(ExprKind::IntConst(sym), start))
            }
            TokenKind::StrConst(text) => {
                self.advance();
                let sym = self.interner.intern(&text);
                Ok(Expr::new(ExprKind::StrConst(sym), start))
            }
            TokenKind::True => {
                self.advance();
                Ok(Expr::new(ExprKind::BoolConst(true), start))
            }
            TokenKind::False => {
                self.advance();
                Ok(Expr::new(ExprKind::BoolConst(false), start))
            }
            TokenKind::ObjectId(name) => {
                self.advance();
                let sym = self.interner.intern(&name);
                if self.check(&TokenKind::LParen) {
                    // Bare call: dispatch on an implicit self
                    self.advance();
                    let args = self.parse_actuals()?;
                    let span = start.merge(&self.prev_span());
                    let receiver = Expr::new(ExprKind::Ident(self.sym_self), start);
                    Ok(Expr::new(
                        ExprKind::Dispatch {
                            receiver: Box::new(receiver),
                            method: sym,
                            args,
                        },
                        span,
                    ))
                } else {
                    Ok(Expr::new(ExprKind::Ident(sym), start))
                }
            }
            TokenKind::New => {
                self.advance();
                let (ty, _) = self.parse_type_id()?;
                let span = start.merge(&self.prev_span());
                Ok(Expr::new(ExprKind::New(ty), span))
            }
            TokenKind::If => {
                self.advance();
                let cond = self.parse_expr()?;
                self.expect(TokenKind::Then)?;
                let then_branch = self.parse_expr()?;
                self.expect(TokenKind::Else)?;
                let else_branch = self.parse_expr()?;
                self.expect(TokenKind::Fi)?;
                let span = start.merge(&self.prev_span());
                Ok(Expr::new(
                    ExprKind::If {
                        cond: Box::new(cond),
                        then_branch: Box::new(then_branch),
                        else_branch: Box::new(else_branch),
                    },
                    span,
                ))
            }
            TokenKind::While => {
                self.advance();
                let cond = self.parse_expr()?;
                self.expect(TokenKind::Loop)?;
                let body = self.parse_expr()?;
                self.expect(TokenKind::Pool)?;
                let span = start.merge(&self.prev_span());
                Ok(Expr::new(
                    ExprKind::While { cond: Box::new(cond), body: Box::new(body) },
                    span,
                ))
            }
            TokenKind::LBrace => {
                self.advance();
                let mut body = Vec::new();
                while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
                    body.push(self.parse_expr()?);
                    self.expect(TokenKind::Semicolon)?;
                }
                self.expect(TokenKind::RBrace)?;
                if body.is_empty() {
                    return Err(Error::ExpectedExpr { span: start });
                }
                let span = start.merge(&self.prev_span());
                Ok(Expr::new(ExprKind::Block(body), span))
            }
            TokenKind::Let => {
                self.advance();
                self.parse_let_bindings(start)
            }
            TokenKind::Case => {
                self.advance();
                let scrutinee = self.parse_expr()?;
                self.expect(TokenKind::Of)?;
                let mut branches = Vec::new();
                while !self.check(&TokenKind::Esac) && !self.is_at_end() {
                    branches.push(self.parse_case_branch()?);
                    self.expect(TokenKind::Semicolon)?;
                }
                self.expect(TokenKind::Esac)?;
                if branches.is_empty() {
                    return Err(Error::ExpectedExpr { span: start });
                }
                let span = start.merge(&self.prev_span());
                Ok(Expr::new(
                    ExprKind::Case { scrutinee: Box::new(scrutinee), branches },
                    span,
                ))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            _ => Err(Error::ExpectedExpr { span: start }),
        }
    }

    /// Parse the binding list of a `let` and desugar it into nested
    /// single-binding nodes, each scoping everything to its right
    fn parse_let_bindings(&mut self, start: Span) -> Result<Expr> {
        let mut bindings = Vec::new();
        loop {
            let bind_start = self.current().span;
            let (name, _) = self.parse_object_id()?;
            self.expect(TokenKind::Colon)?;
            let (declared_type, _) = self.parse_type_id()?;
            let init = if self.consume(&TokenKind::Assign) {
                Some(Box::new(self.parse_expr()?))
            } else {
                None
            };
            bindings.push((name, declared_type, init, bind_start));
            if !self.consume(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::In)?;
        let body = self.parse_expr()?;

        let mut expr = body;
        for (name, declared_type, init, bind_start) in bindings.into_iter().rev() {
            let span = bind_start.merge(&expr.span);
            expr = Expr::new(
                ExprKind::Let {
                    name,
                    declared_type,
                    init,
                    body: Box::new(expr),
                },
                span,
            );
        }
        // The outermost node covers the let keyword itself
        expr.span = start.merge(&expr.span);
        Ok(expr)
    }

    fn parse_case_branch(&mut self) -> Result<CaseBranch> {
        let start = self.current().span;
        let (name, _) = self.parse_object_id()?;
        self.expect(TokenKind::Colon)?;
        let (declared_type, _) = self.parse_type_id()?;
        self.expect(TokenKind::DArrow)?;
        let body = self.parse_expr()?;
        Ok(CaseBranch {
            name,
            declared_type,
            body,
            span: start.merge(&self.prev_span()),
        })
    }
}
