//! Type system: primitive lattice, `TypeReference`, operator/cast tables.
//!
//! Implements `spec.md` §3 (Type/TypeReference/OperatorImpl/OperatorFunc)
//! and §4.5 (primitive lattice, operator overload seeding, `canAssign`).
//!
//! Nodes (`Type`, `Function`, `Variable`) live in index-addressed slabs
//! owned by [`crate::namespace::World`] rather than in a `bumpalo::Arena`
//! directly: `spec.md` §9 calls this out as an equally acceptable
//! alternative to a bump arena ("either raw back-references or stable
//! indices"), and it sidesteps the self-referential-graph problem of
//! growing a namespace tree whose nodes reference each other mutably
//! while it's still being built.

use crate::ast::expr::ExprId;
use crate::token::{PrimitiveKeyword, TokenKind};
use linxc_base::Symbol;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(pub u32);
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FuncId(pub u32);
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarId(pub u32);
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NamespaceId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveKind {
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    Float,
    Double,
    Char,
    Void,
    Bool,
}

impl PrimitiveKind {
    pub const INTEGERS: [PrimitiveKind; 8] = [
        PrimitiveKind::U8,
        PrimitiveKind::U16,
        PrimitiveKind::U32,
        PrimitiveKind::U64,
        PrimitiveKind::I8,
        PrimitiveKind::I16,
        PrimitiveKind::I32,
        PrimitiveKind::I64,
    ];

    pub fn from_keyword(kw: PrimitiveKeyword) -> PrimitiveKind {
        match kw {
            PrimitiveKeyword::U8 => PrimitiveKind::U8,
            PrimitiveKeyword::U16 => PrimitiveKind::U16,
            PrimitiveKeyword::U32 => PrimitiveKind::U32,
            PrimitiveKeyword::U64 => PrimitiveKind::U64,
            PrimitiveKeyword::I8 => PrimitiveKind::I8,
            PrimitiveKeyword::I16 => PrimitiveKind::I16,
            PrimitiveKeyword::I32 => PrimitiveKind::I32,
            PrimitiveKeyword::I64 => PrimitiveKind::I64,
            PrimitiveKeyword::Float => PrimitiveKind::Float,
            PrimitiveKeyword::Double => PrimitiveKind::Double,
            PrimitiveKeyword::Char => PrimitiveKind::Char,
            PrimitiveKeyword::Void => PrimitiveKind::Void,
            PrimitiveKeyword::Bool => PrimitiveKind::Bool,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::U8 => "u8",
            PrimitiveKind::U16 => "u16",
            PrimitiveKind::U32 => "u32",
            PrimitiveKind::U64 => "u64",
            PrimitiveKind::I8 => "i8",
            PrimitiveKind::I16 => "i16",
            PrimitiveKind::I32 => "i32",
            PrimitiveKind::I64 => "i64",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Void => "void",
            PrimitiveKind::Bool => "bool",
        }
    }

    pub fn is_integer(self) -> bool {
        PrimitiveKind::INTEGERS.contains(&self)
    }

    pub fn is_signed(self) -> bool {
        matches!(
            self,
            PrimitiveKind::I8 | PrimitiveKind::I16 | PrimitiveKind::I32 | PrimitiveKind::I64
        )
    }

    /// Bit width used for widening comparisons. Computed from an explicit
    /// table rather than relying on enum declaration order (the original
    /// C++ `GetOperationResult` compared raw enum ordinals and subtracted
    /// 4 to cross signedness bands — see `SPEC_FULL.md` §C for why that
    /// trick is not reproduced here).
    pub fn bit_width(self) -> u32 {
        match self {
            PrimitiveKind::U8 | PrimitiveKind::I8 => 8,
            PrimitiveKind::U16 | PrimitiveKind::I16 => 16,
            PrimitiveKind::U32 | PrimitiveKind::I32 => 32,
            PrimitiveKind::U64 | PrimitiveKind::I64 => 64,
            PrimitiveKind::Float => 32,
            PrimitiveKind::Double => 64,
            PrimitiveKind::Char => 8,
            PrimitiveKind::Bool => 1,
            PrimitiveKind::Void => 0,
        }
    }
}

/// A use-site reference to a declared `Type`: target, pointer depth,
/// const flag, and template arguments (`spec.md` §3).
#[derive(Debug, Clone)]
pub struct TypeReference {
    /// `None` when this reference names an as-yet-unresolved generic
    /// parameter (e.g. inside a template body before specialization).
    pub target: Option<TypeId>,
    pub generic_name: Option<Symbol>,
    pub template_args: Vec<TypeReference>,
    pub pointer_count: u32,
    pub is_const: bool,
}

impl TypeReference {
    pub fn of(target: TypeId) -> Self {
        TypeReference {
            target: Some(target),
            generic_name: None,
            template_args: Vec::new(),
            pointer_count: 0,
            is_const: false,
        }
    }

    pub fn unresolved(name: Symbol) -> Self {
        TypeReference {
            target: None,
            generic_name: Some(name),
            template_args: Vec::new(),
            pointer_count: 0,
            is_const: false,
        }
    }

    /// The sentinel `resolvesTo` value used by expressions that denote a
    /// compile-time entity (a type, a namespace) rather than a runtime
    /// value — `spec.md` §3's `resolvesTo.target == null` invariant.
    pub fn none_sentinel() -> Self {
        TypeReference {
            target: None,
            generic_name: None,
            template_args: Vec::new(),
            pointer_count: 0,
            is_const: false,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.target.is_none() && self.generic_name.is_none()
    }

    pub fn with_pointer_depth(mut self, depth: u32) -> Self {
        self.pointer_count = depth;
        self
    }

    pub fn with_const(mut self, is_const: bool) -> Self {
        self.is_const = is_const;
        self
    }
}

/// Two `TypeReference`s are equal when target, pointer depth, and
/// template args match element-wise; `const` is deliberately *not* part
/// of identity (`spec.md` §3).
impl PartialEq for TypeReference {
    fn eq(&self, other: &Self) -> bool {
        self.target == other.target
            && self.generic_name == other.generic_name
            && self.pointer_count == other.pointer_count
            && self.template_args == other.template_args
    }
}
impl Eq for TypeReference {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
    BitAnd,
    BitOr,
    BitXor,
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
}

impl BinOp {
    pub fn from_token(kind: TokenKind) -> Option<BinOp> {
        Some(match kind {
            TokenKind::Plus => BinOp::Add,
            TokenKind::Minus => BinOp::Sub,
            TokenKind::Star => BinOp::Mul,
            TokenKind::Slash => BinOp::Div,
            TokenKind::Percent => BinOp::Mod,
            TokenKind::EqEq => BinOp::Eq,
            TokenKind::BangEq => BinOp::NotEq,
            TokenKind::Lt => BinOp::Lt,
            TokenKind::LtEq => BinOp::LtEq,
            TokenKind::Gt => BinOp::Gt,
            TokenKind::GtEq => BinOp::GtEq,
            TokenKind::AmpAmp => BinOp::And,
            TokenKind::PipePipe => BinOp::Or,
            TokenKind::Amp => BinOp::BitAnd,
            TokenKind::Pipe => BinOp::BitOr,
            TokenKind::Caret => BinOp::BitXor,
            TokenKind::Eq => BinOp::Assign,
            TokenKind::PlusEq => BinOp::AddAssign,
            TokenKind::MinusEq => BinOp::SubAssign,
            TokenKind::StarEq => BinOp::MulAssign,
            TokenKind::SlashEq => BinOp::DivAssign,
            TokenKind::PercentEq => BinOp::ModAssign,
            _ => return None,
        })
    }

    pub fn is_compound_assign(self) -> bool {
        matches!(
            self,
            BinOp::AddAssign | BinOp::SubAssign | BinOp::MulAssign | BinOp::DivAssign | BinOp::ModAssign
        )
    }

    /// The base operator this compound form queries when looking up the
    /// arithmetic result — `spec.md` §4.4 step 4. **Preserves the
    /// documented bug**: `-=` looks itself up instead of rewriting to
    /// `-`, unlike the other three compound forms (§9 Open Questions,
    /// resolved to "preserve" in `SPEC_FULL.md` §D.1).
    pub fn non_assign_form(self) -> BinOp {
        match self {
            BinOp::AddAssign => BinOp::Add,
            BinOp::SubAssign => BinOp::SubAssign, // bug preserved intentionally
            BinOp::MulAssign => BinOp::Mul,
            BinOp::DivAssign => BinOp::Div,
            BinOp::ModAssign => BinOp::Mod,
            other => other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OperatorImpl {
    Operator {
        op: BinOp,
        left: TypeId,
        right: TypeId,
    },
    Cast {
        from: TypeId,
        to: TypeId,
        implicit: bool,
    },
}

#[derive(Debug, Clone)]
pub struct OperatorFunc {
    pub key: OperatorImpl,
    pub function: FuncId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FuncOwner {
    Namespace(NamespaceId),
    Type(TypeId),
}

#[derive(Debug, Clone)]
pub struct Function {
    pub name: Symbol,
    pub owner: FuncOwner,
    pub return_type: TypeReference,
    pub params: Vec<VarId>,
    pub required_params: u32,
    pub template_params: Vec<Symbol>,
    pub variadic: bool,
    pub body: Vec<crate::ast::stmt::StmtId>,
    pub is_method: bool,
}

#[derive(Debug, Clone)]
pub struct Variable {
    pub name: Symbol,
    pub type_ref: TypeReference,
    pub default_value: Option<ExprId>,
    pub member_of: Option<TypeId>,
    pub is_const: bool,
}

#[derive(Debug, Clone)]
pub struct Type {
    pub name: Symbol,
    pub namespace: NamespaceId,
    pub parent_type: Option<TypeId>,
    pub variables: Vec<VarId>,
    pub methods: Vec<FuncId>,
    pub nested_types: Vec<TypeId>,
    pub enum_members: Vec<(Symbol, i64)>,
    pub template_params: Vec<Symbol>,
    pub operator_overloads: HashMap<OperatorImpl, OperatorFunc>,
    pub specializations: HashMap<Vec<TypeId>, TypeId>,
    pub primitive: Option<PrimitiveKind>,
}

impl Type {
    pub fn new(name: Symbol, namespace: NamespaceId, parent_type: Option<TypeId>) -> Self {
        Type {
            name,
            namespace,
            parent_type,
            variables: Vec::new(),
            methods: Vec::new(),
            nested_types: Vec::new(),
            enum_members: Vec::new(),
            template_params: Vec::new(),
            operator_overloads: HashMap::new(),
            specializations: HashMap::new(),
            primitive: None,
        }
    }
}

/// `canAssign(dst, src)` — `spec.md` §4.5.
///
/// Ordering matters and is preserved exactly from the original source
/// (`parser.hpp: LinxcParser::CanAssign`): the string-literal special
/// case is checked first, then the unresolved-generic escape hatches,
/// then identity-or-implicit-cast.
pub fn can_assign(
    dst: &TypeReference,
    src: &TypeReference,
    src_is_string_literal: bool,
    u8_type: TypeId,
    void_type: TypeId,
    casts: &HashMap<(TypeId, TypeId), bool>,
) -> bool {
    if src_is_string_literal && dst.target == Some(u8_type) && src.target == Some(u8_type) {
        return dst.pointer_count == 1 && src.pointer_count == 1 && dst.is_const;
    }
    if dst.target.is_none() {
        return true;
    }
    if src.target.is_none() {
        return true;
    }
    if dst == src {
        return true;
    }
    if dst.target == Some(void_type) && dst.pointer_count >= 1 && src.pointer_count >= 1 {
        return true;
    }
    if let (Some(s), Some(d)) = (src.target, dst.target) {
        if let Some(&implicit) = casts.get(&(s, d)) {
            return implicit;
        }
    }
    false
}

/// Result type of arithmetic `+ - * /` between two numeric primitives,
/// per the promotion rule in `spec.md` §4.5: same-signedness picks the
/// wider type; mixed signedness converts the signed operand to unsigned
/// then picks the wider; `double` beats `float` beats integers.
pub fn arithmetic_result(a: PrimitiveKind, b: PrimitiveKind) -> PrimitiveKind {
    if a == PrimitiveKind::Double || b == PrimitiveKind::Double {
        return PrimitiveKind::Double;
    }
    if a == PrimitiveKind::Float || b == PrimitiveKind::Float {
        return PrimitiveKind::Float;
    }
    if a.is_signed() == b.is_signed() {
        if a.bit_width() >= b.bit_width() {
            a
        } else {
            b
        }
    } else {
        let a_unsigned = to_unsigned(a);
        let b_unsigned = to_unsigned(b);
        if a_unsigned.bit_width() >= b_unsigned.bit_width() {
            a_unsigned
        } else {
            b_unsigned
        }
    }
}

fn to_unsigned(p: PrimitiveKind) -> PrimitiveKind {
    match p {
        PrimitiveKind::I8 => PrimitiveKind::U8,
        PrimitiveKind::I16 => PrimitiveKind::U16,
        PrimitiveKind::I32 => PrimitiveKind::U32,
        PrimitiveKind::I64 => PrimitiveKind::U64,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_reference_equality_ignores_const() {
        let a = TypeReference::of(TypeId(1)).with_const(true);
        let b = TypeReference::of(TypeId(1)).with_const(false);
        assert_eq!(a, b);
    }

    #[test]
    fn type_reference_equality_checks_pointer_depth() {
        let a = TypeReference::of(TypeId(1)).with_pointer_depth(1);
        let b = TypeReference::of(TypeId(1)).with_pointer_depth(2);
        assert_ne!(a, b);
    }

    #[test]
    fn sentinel_has_no_target_or_name() {
        assert!(TypeReference::none_sentinel().is_sentinel());
        assert!(!TypeReference::of(TypeId(0)).is_sentinel());
    }

    #[test]
    fn minus_assign_bug_is_preserved() {
        assert_eq!(BinOp::SubAssign.non_assign_form(), BinOp::SubAssign);
        assert_eq!(BinOp::AddAssign.non_assign_form(), BinOp::Add);
        assert_eq!(BinOp::MulAssign.non_assign_form(), BinOp::Mul);
        assert_eq!(BinOp::DivAssign.non_assign_form(), BinOp::Div);
    }

    #[test]
    fn arithmetic_result_same_signedness_picks_wider() {
        assert_eq!(arithmetic_result(PrimitiveKind::I32, PrimitiveKind::I64), PrimitiveKind::I64);
        assert_eq!(arithmetic_result(PrimitiveKind::U8, PrimitiveKind::U16), PrimitiveKind::U16);
    }

    #[test]
    fn arithmetic_result_mixed_signedness_converts_to_unsigned() {
        assert_eq!(arithmetic_result(PrimitiveKind::U8, PrimitiveKind::I32), PrimitiveKind::U32);
        assert_eq!(arithmetic_result(PrimitiveKind::U64, PrimitiveKind::I32), PrimitiveKind::U64);
    }

    #[test]
    fn arithmetic_result_float_and_double_dominate() {
        assert_eq!(arithmetic_result(PrimitiveKind::I32, PrimitiveKind::Float), PrimitiveKind::Float);
        assert_eq!(arithmetic_result(PrimitiveKind::Float, PrimitiveKind::Double), PrimitiveKind::Double);
    }

    #[test]
    fn can_assign_reflexive() {
        let t = TypeReference::of(TypeId(3));
        let casts = HashMap::new();
        assert!(can_assign(&t, &t, false, TypeId(99), TypeId(100), &casts));
    }

    #[test]
    fn can_assign_accepts_implicit_cast() {
        let mut casts = HashMap::new();
        casts.insert((TypeId(1), TypeId(2)), true);
        let dst = TypeReference::of(TypeId(2));
        let src = TypeReference::of(TypeId(1));
        assert!(can_assign(&dst, &src, false, TypeId(99), TypeId(100), &casts));
    }

    #[test]
    fn can_assign_rejects_explicit_only_cast() {
        let mut casts = HashMap::new();
        casts.insert((TypeId(1), TypeId(2)), false);
        let dst = TypeReference::of(TypeId(2));
        let src = TypeReference::of(TypeId(1));
        assert!(!can_assign(&dst, &src, false, TypeId(99), TypeId(100), &casts));
    }

    #[test]
    fn can_assign_string_literal_requires_const_u8_pointer() {
        let casts = HashMap::new();
        let u8_ty = TypeId(5);
        let void_ty = TypeId(100);
        let const_u8_ptr = TypeReference::of(u8_ty).with_pointer_depth(1).with_const(true);
        let mut_u8_ptr = TypeReference::of(u8_ty).with_pointer_depth(1).with_const(false);
        let literal = TypeReference::of(u8_ty).with_pointer_depth(1).with_const(true);
        assert!(can_assign(&const_u8_ptr, &literal, true, u8_ty, void_ty, &casts));
        assert!(!can_assign(&mut_u8_ptr, &literal, true, u8_ty, void_ty, &casts));
    }

    #[test]
    fn can_assign_accepts_any_pointer_into_void_star() {
        let casts = HashMap::new();
        let void_ty = TypeId(100);
        let dst = TypeReference::of(void_ty).with_pointer_depth(1);
        let src = TypeReference::of(TypeId(7)).with_pointer_depth(1);
        assert!(can_assign(&dst, &src, false, TypeId(99), void_ty, &casts));
    }

    #[test]
    fn can_assign_rejects_non_pointer_into_void_star() {
        let casts = HashMap::new();
        let void_ty = TypeId(100);
        let dst = TypeReference::of(void_ty).with_pointer_depth(1);
        let src = TypeReference::of(TypeId(7));
        assert!(!can_assign(&dst, &src, false, TypeId(99), void_ty, &casts));
    }
}
