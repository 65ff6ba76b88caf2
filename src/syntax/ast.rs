//! Owned Python syntax model.
//!
//! Only the shapes the structural parsers and emitters reason about are
//! modeled; everything else is carried as [`Expr::Raw`] / [`Stmt::Raw`]
//! source text and printed back unchanged.

#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    None,
    Bool(bool),
    Str(String),
    /// Integer or float literal, as written
    Number(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Name(String),
    Constant(Constant),
    Attribute { value: Box<Expr>, attr: String },
    Call(Call),
    Tuple(Vec<Expr>),
    List(Vec<Expr>),
    /// Any other expression, as source text
    Raw(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub func: Box<Expr>,
    pub args: Vec<Expr>,
    pub keywords: Vec<Keyword>,
}

/// `arg=value`, or `**value` when `arg` is `None`
#[derive(Debug, Clone, PartialEq)]
pub struct Keyword {
    pub arg: Option<String>,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expr(Expr),
    Assign {
        target: Expr,
        value: Expr,
    },
    AnnAssign {
        target: Expr,
        annotation: Expr,
        value: Option<Expr>,
    },
    FunctionDef(FunctionDef),
    ClassDef(ClassDef),
    Return(Option<Expr>),
    Pass,
    /// Any other statement (or a comment), dedented to column zero
    Raw(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Arg {
    pub name: String,
    pub annotation: Option<Expr>,
    pub default: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Arguments {
    pub posonlyargs: Vec<Arg>,
    pub args: Vec<Arg>,
    pub vararg: Option<Arg>,
    pub kwonlyargs: Vec<Arg>,
    pub kwarg: Option<Arg>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FunctionDef {
    pub name: String,
    pub decorators: Vec<Expr>,
    pub is_async: bool,
    pub args: Arguments,
    pub returns: Option<Expr>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClassDef {
    pub name: String,
    pub decorators: Vec<Expr>,
    pub bases: Vec<Expr>,
    pub keywords: Vec<Keyword>,
    pub body: Vec<Stmt>,
}

impl Expr {
    pub fn name(id: impl Into<String>) -> Self {
        Self::Name(id.into())
    }

    pub fn str(value: impl Into<String>) -> Self {
        Self::Constant(Constant::Str(value.into()))
    }

    pub fn attr(value: Expr, attr: impl Into<String>) -> Self {
        Self::Attribute {
            value: Box::new(value),
            attr: attr.into(),
        }
    }

    pub fn call(func: Expr, args: Vec<Expr>, keywords: Vec<Keyword>) -> Self {
        Self::Call(Call {
            func: Box::new(func),
            args,
            keywords,
        })
    }

    /// String constant contents
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Constant(Constant::Str(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_call(&self) -> Option<&Call> {
        match self {
            Self::Call(call) => Some(call),
            _ => None,
        }
    }

    /// `a.b.c` for names and attribute chains
    pub fn dotted_name(&self) -> Option<String> {
        match self {
            Self::Name(id) => Some(id.clone()),
            Self::Attribute { value, attr } => {
                value.dotted_name().map(|base| format!("{base}.{attr}"))
            }
            _ => None,
        }
    }
}

impl Keyword {
    pub fn new(arg: impl Into<String>, value: Expr) -> Self {
        Self {
            arg: Some(arg.into()),
            value,
        }
    }
}

impl Call {
    /// Last segment of the callee (`Column` for both `Column` and `sa.Column`)
    pub fn callee_name(&self) -> Option<&str> {
        match self.func.as_ref() {
            Expr::Name(id) => Some(id),
            Expr::Attribute { attr, .. } => Some(attr),
            _ => None,
        }
    }

    pub fn keyword(&self, name: &str) -> Option<&Expr> {
        self.keywords
            .iter()
            .find(|k| k.arg.as_deref() == Some(name))
            .map(|k| &k.value)
    }
}

impl Arg {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Arguments {
    /// Positional-only then positional-or-keyword arguments
    pub fn positional(&self) -> impl Iterator<Item = &Arg> {
        self.posonlyargs.iter().chain(self.args.iter())
    }
}

impl Stmt {
    pub fn docstring(text: impl Into<String>) -> Self {
        Self::Expr(Expr::str(text))
    }

    /// Contents when this statement is a bare string literal
    pub fn as_docstring(&self) -> Option<&str> {
        match self {
            Self::Expr(expr) => expr.as_str(),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionDef> {
        match self {
            Self::FunctionDef(def) => Some(def),
            _ => None,
        }
    }

    pub fn as_class(&self) -> Option<&ClassDef> {
        match self {
            Self::ClassDef(def) => Some(def),
            _ => None,
        }
    }
}

/// Docstring of a body, if its first statement is a string literal
pub fn body_docstring(body: &[Stmt]) -> Option<&str> {
    body.first().and_then(Stmt::as_docstring)
}

/// Statements after a leading docstring
pub fn body_without_docstring(body: &[Stmt]) -> &[Stmt] {
    match body_docstring(body) {
        Some(_) => &body[1..],
        None => body,
    }
}

/// Function named `name`, or the first function when `name` is `None`
pub fn find_function<'a>(stmts: &'a [Stmt], name: Option<&str>) -> Option<&'a FunctionDef> {
    stmts
        .iter()
        .filter_map(Stmt::as_function)
        .find(|def| name.map_or(true, |n| def.name == n))
}

/// Class named `name`, or the first class when `name` is `None`
pub fn find_class<'a>(stmts: &'a [Stmt], name: Option<&str>) -> Option<&'a ClassDef> {
    stmts
        .iter()
        .filter_map(Stmt::as_class)
        .find(|def| name.map_or(true, |n| def.name == n))
}

/// First call expression in `stmts` whose callee is `callee`, looking
/// through expression statements and assignment values
pub fn find_call<'a>(stmts: &'a [Stmt], callee: &str) -> Option<&'a Call> {
    stmts.iter().find_map(|stmt| {
        let expr = match stmt {
            Stmt::Expr(expr) | Stmt::Assign { value: expr, .. } => expr,
            Stmt::AnnAssign {
                value: Some(expr), ..
            } => expr,
            _ => return None,
        };
        expr.as_call()
            .filter(|call| call.callee_name() == Some(callee))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dotted_name() {
        let expr = Expr::attr(Expr::attr(Expr::name("tf"), "data"), "Dataset");
        assert_eq!(expr.dotted_name().as_deref(), Some("tf.data.Dataset"));
        assert_eq!(Expr::str("x").dotted_name(), None);
    }

    #[test]
    fn test_callee_name_ignores_module_prefix() {
        let call = Call {
            func: Box::new(Expr::attr(Expr::name("sa"), "Column")),
            args: vec![],
            keywords: vec![Keyword::new("nullable", Expr::Constant(Constant::Bool(true)))],
        };
        assert_eq!(call.callee_name(), Some("Column"));
        assert!(call.keyword("nullable").is_some());
        assert!(call.keyword("doc").is_none());
    }

    #[test]
    fn test_body_docstring() {
        let body = vec![Stmt::docstring("Doc"), Stmt::Pass];
        assert_eq!(body_docstring(&body), Some("Doc"));
        assert_eq!(body_without_docstring(&body), &[Stmt::Pass]);
        assert_eq!(body_docstring(&[Stmt::Pass]), None);
    }
}
