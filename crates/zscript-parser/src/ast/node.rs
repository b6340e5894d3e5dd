//! Tree node variants.
//!
//! Every node in the [`AstArena`](super::AstArena) carries a [`NodeKind`] tag
//! and a [`NodeData`] payload. Child lists are referenced by the [`NodeId`]
//! of their first member; the rest of the list hangs off that node's
//! sibling ring.

use std::fmt;

use bitflags::bitflags;
use ordered_float::OrderedFloat;
use zscript_core::Name;

use super::NodeId;
use super::ops::{AssignOp, BinaryOp, PostfixOp, UnaryOp};

/// The type tag of a tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Identifier,
    Class,
    Struct,
    ExtendClass,
    Enum,
    Enumerator,
    ConstantDef,
    VarDeclarator,
    VarName,
    FuncDeclarator,
    FuncParamDecl,
    BasicType,
    MapType,
    DynArrayType,
    ClassType,
    CompoundStmt,
    ExpressionStmt,
    LocalVarStmt,
    IfStmt,
    IterationStmt,
    SwitchStmt,
    CaseStmt,
    JumpStmt,
    ReturnStmt,
    ExprConstant,
    ExprId,
    ExprSuper,
    ExprTypeRef,
    ExprUnary,
    ExprPostfix,
    ExprBinary,
    ExprAssign,
    ExprTernary,
    ExprFuncCall,
    FuncParm,
    ExprMemberAccess,
    ExprIndex,
    VectorInitializer,
}

impl NodeKind {
    /// The name used for this kind in AST dumps.
    pub fn as_str(self) -> &'static str {
        use NodeKind::*;
        match self {
            Identifier => "identifier",
            Class => "class",
            Struct => "struct",
            ExtendClass => "extend-class",
            Enum => "enum",
            Enumerator => "enumerator",
            ConstantDef => "constant-def",
            VarDeclarator => "var-declarator",
            VarName => "var-name",
            FuncDeclarator => "func-declarator",
            FuncParamDecl => "func-param-decl",
            BasicType => "basic-type",
            MapType => "map-type",
            DynArrayType => "dyn-array-type",
            ClassType => "class-type",
            CompoundStmt => "compound-stmt",
            ExpressionStmt => "expression-stmt",
            LocalVarStmt => "local-var-stmt",
            IfStmt => "if-stmt",
            IterationStmt => "iteration-stmt",
            SwitchStmt => "switch-stmt",
            CaseStmt => "case-stmt",
            JumpStmt => "jump-stmt",
            ReturnStmt => "return-stmt",
            ExprConstant => "expr-constant",
            ExprId => "expr-id",
            ExprSuper => "expr-super",
            ExprTypeRef => "expr-type-ref",
            ExprUnary => "expr-unary",
            ExprPostfix => "expr-postfix",
            ExprBinary => "expr-binary",
            ExprAssign => "expr-assign",
            ExprTernary => "expr-ternary",
            ExprFuncCall => "expr-func-call",
            FuncParm => "func-parm",
            ExprMemberAccess => "expr-member-access",
            ExprIndex => "expr-index",
            VectorInitializer => "vector-initializer",
        }
    }

    /// Whether nodes of this kind are top-level declarations.
    pub fn is_declaration(self) -> bool {
        matches!(
            self,
            NodeKind::Class
                | NodeKind::Struct
                | NodeKind::ExtendClass
                | NodeKind::Enum
                | NodeKind::ConstantDef
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags! {
    /// Declaration modifiers on classes, structs, fields and methods.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DeclFlags: u32 {
        const ABSTRACT = 1 << 0;
        const NATIVE = 1 << 1;
        const STATIC = 1 << 2;
        const PRIVATE = 1 << 3;
        const PROTECTED = 1 << 4;
        const FINAL = 1 << 5;
        const META = 1 << 6;
        const DEPRECATED = 1 << 7;
        const READONLY = 1 << 8;
        const ACTION = 1 << 9;
        const LATENT = 1 << 10;
        const VIRTUAL = 1 << 11;
        const OVERRIDE = 1 << 12;
        const UI = 1 << 13;
        const PLAY = 1 << 14;
        const CLEARSCOPE = 1 << 15;
    }
}

bitflags! {
    /// Parameter passing modifiers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ParamFlags: u8 {
        const IN = 1 << 0;
        const OUT = 1 << 1;
        const OPTIONAL = 1 << 2;
    }
}

/// A constant value as written in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstValue<'s> {
    Int(i64),
    UInt(u64),
    Float(OrderedFloat<f64>),
    String(&'s str),
    Name(Name),
    Bool(bool),
    Null,
}

impl fmt::Display for ConstValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstValue::Int(v) => write!(f, "{v}"),
            ConstValue::UInt(v) => write!(f, "{v}u"),
            ConstValue::Float(v) => write!(f, "{:?}", v.0),
            ConstValue::String(s) => write!(f, "{s:?}"),
            ConstValue::Name(n) => write!(f, "'{n}'"),
            ConstValue::Bool(b) => write!(f, "{b}"),
            ConstValue::Null => f.write_str("null"),
        }
    }
}

/// `break` or `continue`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JumpKind {
    Break,
    Continue,
}

/// Where an iteration statement evaluates its condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckAt {
    /// `while`, `until`, `for`.
    Start,
    /// `do ... while`, `do ... until`.
    End,
}

/// The payload of a tree node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeData<'s> {
    /// One component of a dotted name; groups form `A.B.C`.
    Identifier { name: Name },

    Class {
        name: Name,
        /// Identifier group of the parent class.
        parent: Option<NodeId>,
        /// Identifier group of the replaced class.
        replaces: Option<NodeId>,
        flags: DeclFlags,
        body: Option<NodeId>,
    },
    Struct {
        name: Name,
        flags: DeclFlags,
        body: Option<NodeId>,
    },
    ExtendClass {
        name: Name,
        body: Option<NodeId>,
    },
    Enum {
        name: Name,
        base_type: Option<NodeId>,
        enumerators: Option<NodeId>,
    },
    Enumerator {
        name: Name,
        value: Option<NodeId>,
    },
    ConstantDef {
        name: Name,
        value: NodeId,
    },
    VarDeclarator {
        flags: DeclFlags,
        ty: NodeId,
        /// `VarName` group.
        names: NodeId,
    },
    VarName {
        name: Name,
        array_size: Option<NodeId>,
        init: Option<NodeId>,
    },
    FuncDeclarator {
        flags: DeclFlags,
        /// Type group; absent for `void`.
        returns: Option<NodeId>,
        name: Name,
        params: Option<NodeId>,
        is_const: bool,
        body: Option<NodeId>,
    },
    FuncParamDecl {
        flags: ParamFlags,
        ty: NodeId,
        name: Name,
        default: Option<NodeId>,
    },

    /// A built-in type (`name` set) or a user type (`user_type` set).
    BasicType {
        name: Name,
        user_type: Option<NodeId>,
        array_size: Option<NodeId>,
    },
    MapType {
        key: NodeId,
        value: NodeId,
        array_size: Option<NodeId>,
    },
    DynArrayType {
        element: NodeId,
        array_size: Option<NodeId>,
    },
    ClassType {
        restriction: Option<NodeId>,
        array_size: Option<NodeId>,
    },

    CompoundStmt {
        content: Option<NodeId>,
    },
    ExpressionStmt {
        expr: NodeId,
    },
    LocalVarStmt {
        ty: NodeId,
        vars: NodeId,
    },
    IfStmt {
        condition: NodeId,
        then_branch: NodeId,
        else_branch: Option<NodeId>,
    },
    IterationStmt {
        init: Option<NodeId>,
        condition: Option<NodeId>,
        update: Option<NodeId>,
        body: NodeId,
        check_at: CheckAt,
    },
    SwitchStmt {
        condition: NodeId,
        content: Option<NodeId>,
    },
    /// `case expr:`, or `default:` when `condition` is `None`.
    CaseStmt {
        condition: Option<NodeId>,
    },
    JumpStmt {
        kind: JumpKind,
    },
    ReturnStmt {
        values: Option<NodeId>,
    },

    ExprConstant {
        value: ConstValue<'s>,
    },
    ExprId {
        name: Name,
    },
    ExprSuper,
    /// A built-in type used as a value, as in `int(x)`.
    ExprTypeRef {
        name: Name,
    },
    ExprUnary {
        op: UnaryOp,
        operand: NodeId,
    },
    ExprPostfix {
        op: PostfixOp,
        operand: NodeId,
    },
    ExprBinary {
        op: BinaryOp,
        left: NodeId,
        right: NodeId,
    },
    ExprAssign {
        op: AssignOp,
        target: NodeId,
        value: NodeId,
    },
    ExprTernary {
        condition: NodeId,
        then_value: NodeId,
        else_value: NodeId,
    },
    ExprFuncCall {
        function: NodeId,
        /// `FuncParm` group.
        args: Option<NodeId>,
    },
    /// One call argument, optionally labelled `name: value`.
    FuncParm {
        label: Name,
        value: NodeId,
    },
    ExprMemberAccess {
        object: NodeId,
        member: Name,
    },
    ExprIndex {
        array: NodeId,
        index: NodeId,
    },
    VectorInitializer {
        x: NodeId,
        y: NodeId,
        z: Option<NodeId>,
    },
}

impl NodeData<'_> {
    /// The type tag for this payload.
    pub fn kind(&self) -> NodeKind {
        use NodeData as D;
        use NodeKind as K;
        match self {
            D::Identifier { .. } => K::Identifier,
            D::Class { .. } => K::Class,
            D::Struct { .. } => K::Struct,
            D::ExtendClass { .. } => K::ExtendClass,
            D::Enum { .. } => K::Enum,
            D::Enumerator { .. } => K::Enumerator,
            D::ConstantDef { .. } => K::ConstantDef,
            D::VarDeclarator { .. } => K::VarDeclarator,
            D::VarName { .. } => K::VarName,
            D::FuncDeclarator { .. } => K::FuncDeclarator,
            D::FuncParamDecl { .. } => K::FuncParamDecl,
            D::BasicType { .. } => K::BasicType,
            D::MapType { .. } => K::MapType,
            D::DynArrayType { .. } => K::DynArrayType,
            D::ClassType { .. } => K::ClassType,
            D::CompoundStmt { .. } => K::CompoundStmt,
            D::ExpressionStmt { .. } => K::ExpressionStmt,
            D::LocalVarStmt { .. } => K::LocalVarStmt,
            D::IfStmt { .. } => K::IfStmt,
            D::IterationStmt { .. } => K::IterationStmt,
            D::SwitchStmt { .. } => K::SwitchStmt,
            D::CaseStmt { .. } => K::CaseStmt,
            D::JumpStmt { .. } => K::JumpStmt,
            D::ReturnStmt { .. } => K::ReturnStmt,
            D::ExprConstant { .. } => K::ExprConstant,
            D::ExprId { .. } => K::ExprId,
            D::ExprSuper => K::ExprSuper,
            D::ExprTypeRef { .. } => K::ExprTypeRef,
            D::ExprUnary { .. } => K::ExprUnary,
            D::ExprPostfix { .. } => K::ExprPostfix,
            D::ExprBinary { .. } => K::ExprBinary,
            D::ExprAssign { .. } => K::ExprAssign,
            D::ExprTernary { .. } => K::ExprTernary,
            D::ExprFuncCall { .. } => K::ExprFuncCall,
            D::FuncParm { .. } => K::FuncParm,
            D::ExprMemberAccess { .. } => K::ExprMemberAccess,
            D::ExprIndex { .. } => K::ExprIndex,
            D::VectorInitializer { .. } => K::VectorInitializer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_reports_its_kind() {
        let data = NodeData::ExprId { name: Name::new("x") };
        assert_eq!(data.kind(), NodeKind::ExprId);
        assert_eq!(NodeData::ExprSuper.kind(), NodeKind::ExprSuper);
    }

    #[test]
    fn declaration_kinds() {
        assert!(NodeKind::Class.is_declaration());
        assert!(NodeKind::ConstantDef.is_declaration());
        assert!(!NodeKind::FuncDeclarator.is_declaration());
    }

    #[test]
    fn flags_combine() {
        let flags = DeclFlags::NATIVE | DeclFlags::UI;
        assert!(flags.contains(DeclFlags::UI));
        assert!(!flags.contains(DeclFlags::PLAY));
        assert!(DeclFlags::default().is_empty());
    }

    #[test]
    fn constant_display() {
        assert_eq!(ConstValue::Int(-3).to_string(), "-3");
        assert_eq!(ConstValue::UInt(3).to_string(), "3u");
        assert_eq!(ConstValue::Float(OrderedFloat(1.0)).to_string(), "1.0");
        assert_eq!(ConstValue::String("a").to_string(), "\"a\"");
        assert_eq!(ConstValue::Null.to_string(), "null");
    }
}
