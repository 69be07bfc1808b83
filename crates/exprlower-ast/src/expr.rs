//! Expression nodes of the embedded language.
//!
//! Every node is allocated once in an arena and referenced by identity. The
//! [`ExprId`] assigned at construction is what inference tables and the output
//! sink key on; nodes are never copied into new identities.
//!
//! The set of kinds is open: [`ExprKind::Extension`] carries nodes contributed
//! by language extensions that the core has no strategy for.

use exprlower_core::Span;

use crate::types::TypeExpr;

/// Identity of an expression node within one tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId(pub u32);

/// An expression node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Expr<'ast> {
    /// Identity of this node
    pub id: ExprId,
    /// What kind of expression this is
    pub kind: ExprKind<'ast>,
    /// Source location
    pub span: Span,
}

/// The kinds of expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExprKind<'ast> {
    /// `{ a; b; c }`
    Block(BlockExpr<'ast>),
    /// `val x = init` / `var x : T = init`
    VarDecl(&'ast VarDeclExpr<'ast>),
    /// Reference to a variable, field or `this`, method call, or operator application
    FeatureCall(&'ast FeatureCallExpr<'ast>),
    /// `new T(args)`
    ConstructorCall(&'ast ConstructorCallExpr<'ast>),
    /// Literal value
    Literal(LiteralKind<'ast>),
    /// `if (c) a else b`
    If(&'ast IfExpr<'ast>),
    /// `return value`
    Return(ReturnExpr<'ast>),
    /// `throw value`
    Throw(ThrowExpr<'ast>),
    /// `value as T`
    Cast(&'ast CastExpr<'ast>),
    /// `target = value`
    Assign(&'ast AssignExpr<'ast>),
    /// A node kind contributed by a language extension
    Extension(ExtensionExpr<'ast>),
}

impl<'ast> Expr<'ast> {
    /// Name of this node's kind, used in diagnostics and as the last-resort
    /// variable name.
    pub fn kind_name(&self) -> &'ast str {
        match self.kind {
            ExprKind::Block(_) => "BlockExpression",
            ExprKind::VarDecl(_) => "VariableDeclaration",
            ExprKind::FeatureCall(_) => "FeatureCall",
            ExprKind::ConstructorCall(_) => "ConstructorCall",
            ExprKind::Literal(lit) => lit.kind_name(),
            ExprKind::If(_) => "IfExpression",
            ExprKind::Return(_) => "ReturnExpression",
            ExprKind::Throw(_) => "ThrowExpression",
            ExprKind::Cast(_) => "CastedExpression",
            ExprKind::Assign(_) => "Assignment",
            ExprKind::Extension(ext) => ext.kind_name,
        }
    }

    pub fn as_block(&self) -> Option<&BlockExpr<'ast>> {
        match &self.kind {
            ExprKind::Block(block) => Some(block),
            _ => None,
        }
    }

    pub fn is_block(&self) -> bool {
        matches!(self.kind, ExprKind::Block(_))
    }
}

/// A sequence of expressions; its value is the value of the last one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockExpr<'ast> {
    pub exprs: &'ast [&'ast Expr<'ast>],
}

/// A local variable declaration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VarDeclExpr<'ast> {
    /// Declared name
    pub name: &'ast str,
    /// Explicit type, if written
    pub declared_type: Option<TypeExpr<'ast>>,
    /// `var` (true) or `val` (false)
    pub writeable: bool,
    /// Initializer
    pub init: Option<&'ast Expr<'ast>>,
}

/// What a feature call refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureKind<'ast> {
    /// A local variable; carries the identity of its declaration
    LocalVariable(ExprId),
    /// A parameter of the enclosing function
    Parameter,
    /// A field read
    Field,
    /// An instance method
    Method,
    /// A static method of the declaring type
    StaticMethod,
    /// The enclosing instance
    This,
    /// The enclosing instance as its direct supertype
    Super,
    /// An operator; carries the host operator symbol
    Operator(&'ast str),
}

/// A resolved feature: the target of a feature call or assignment.
///
/// Name and scope resolution happen before lowering, so the feature arrives
/// here already bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Feature<'ast> {
    /// Simple name as declared (`getName`, `operator_plus`, `x`)
    pub name: &'ast str,
    pub kind: FeatureKind<'ast>,
    /// Type declaring the feature (needed for static calls)
    pub declaring_type: Option<TypeExpr<'ast>>,
    /// Declared type of a variable or field; return type of a method
    pub ty: Option<TypeExpr<'ast>>,
    /// Declared parameter types of a method or operator
    pub param_types: &'ast [TypeExpr<'ast>],
    /// Declared exception types of a method
    pub throws: &'ast [TypeExpr<'ast>],
}

impl<'ast> Feature<'ast> {
    fn new(name: &'ast str, kind: FeatureKind<'ast>, ty: Option<TypeExpr<'ast>>) -> Self {
        Self {
            name,
            kind,
            declaring_type: None,
            ty,
            param_types: &[],
            throws: &[],
        }
    }

    /// An instance method returning `ret`.
    pub fn method(name: &'ast str, ret: TypeExpr<'ast>) -> Self {
        Self::new(name, FeatureKind::Method, Some(ret))
    }

    /// A static method of `owner` returning `ret`.
    pub fn static_method(owner: TypeExpr<'ast>, name: &'ast str, ret: TypeExpr<'ast>) -> Self {
        Self {
            declaring_type: Some(owner),
            ..Self::new(name, FeatureKind::StaticMethod, Some(ret))
        }
    }

    pub fn field(name: &'ast str, ty: TypeExpr<'ast>) -> Self {
        Self::new(name, FeatureKind::Field, Some(ty))
    }

    pub fn parameter(name: &'ast str, ty: TypeExpr<'ast>) -> Self {
        Self::new(name, FeatureKind::Parameter, Some(ty))
    }

    /// The enclosing instance; its type comes from the scope.
    pub fn this() -> Self {
        Self::new("this", FeatureKind::This, None)
    }

    /// The enclosing instance seen as its supertype.
    pub fn super_() -> Self {
        Self::new("super", FeatureKind::Super, None)
    }

    /// A local variable declared by `decl`; its type comes from the scope.
    pub fn local(name: &'ast str, decl: ExprId) -> Self {
        Self::new(name, FeatureKind::LocalVariable(decl), None)
    }

    /// An operator such as `operator_plus` lowered to the infix `symbol`.
    pub fn operator(name: &'ast str, symbol: &'ast str, ret: TypeExpr<'ast>) -> Self {
        Self::new(name, FeatureKind::Operator(symbol), Some(ret))
    }

    pub fn with_params(self, param_types: &'ast [TypeExpr<'ast>]) -> Self {
        Self {
            param_types,
            ..self
        }
    }

    pub fn with_throws(self, throws: &'ast [TypeExpr<'ast>]) -> Self {
        Self { throws, ..self }
    }

    pub fn declared_by(self, owner: TypeExpr<'ast>) -> Self {
        Self {
            declaring_type: Some(owner),
            ..self
        }
    }

    /// Whether evaluating this feature invokes code.
    pub fn is_invocation(&self) -> bool {
        matches!(self.kind, FeatureKind::Method | FeatureKind::StaticMethod)
    }
}

/// Reference to a feature, optionally on a receiver, with arguments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureCallExpr<'ast> {
    pub feature: &'ast Feature<'ast>,
    /// Receiver of a method or field access; left operand of a binary operator
    pub receiver: Option<&'ast Expr<'ast>>,
    /// Arguments; right operand of a binary operator
    pub args: &'ast [&'ast Expr<'ast>],
}

/// Instance creation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstructorCallExpr<'ast> {
    pub class: TypeExpr<'ast>,
    pub args: &'ast [&'ast Expr<'ast>],
    /// Declared parameter types of the chosen constructor
    pub param_types: &'ast [TypeExpr<'ast>],
    /// Declared exception types of the chosen constructor
    pub throws: &'ast [TypeExpr<'ast>],
}

/// Literal values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LiteralKind<'ast> {
    Int(i32),
    Long(i64),
    Double(f64),
    Boolean(bool),
    Char(char),
    String(&'ast str),
    Null,
}

impl<'ast> LiteralKind<'ast> {
    pub fn kind_name(&self) -> &'static str {
        match self {
            LiteralKind::Int(_) | LiteralKind::Long(_) | LiteralKind::Double(_) => {
                "NumberLiteral"
            }
            LiteralKind::Boolean(_) => "BooleanLiteral",
            LiteralKind::Char(_) | LiteralKind::String(_) => "StringLiteral",
            LiteralKind::Null => "NullLiteral",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IfExpr<'ast> {
    pub cond: &'ast Expr<'ast>,
    pub then: &'ast Expr<'ast>,
    pub else_: Option<&'ast Expr<'ast>>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnExpr<'ast> {
    pub value: Option<&'ast Expr<'ast>>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThrowExpr<'ast> {
    pub value: &'ast Expr<'ast>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CastExpr<'ast> {
    pub target: TypeExpr<'ast>,
    pub expr: &'ast Expr<'ast>,
}

/// Assignment to a local variable, parameter or field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssignExpr<'ast> {
    pub target: &'ast Feature<'ast>,
    /// Receiver of a field assignment
    pub receiver: Option<&'ast Expr<'ast>>,
    pub value: &'ast Expr<'ast>,
}

/// A node the core knows only by name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtensionExpr<'ast> {
    pub kind_name: &'ast str,
    pub children: &'ast [&'ast Expr<'ast>],
}
