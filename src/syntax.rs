use bitflags::bitflags;
use rustc_hash::FxHashMap;

// Every node kind in the tree, in tag order. The debug dump prints the
// numeric tag, so appending is fine but reordering changes the dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    // Leaves with text
    Whitespace,
    Ident,
    LineComment,
    BlockComment,
    Directive,
    CharLit,
    StringLit,

    // Groups
    Parens,
    Braces,
    Brackets,
    Stmt,
    ForLoop,
    WhileLoop,
    If,
    Else,

    // Reserved so keyword and operator tags match the cx dump numbering
    StructDecl,
    TypedefDecl,

    // Keywords
    KwStruct,
    KwEnum,
    KwTypedef,
    KwUnion,
    KwSizeof,
    KwOffsetof,
    KwFor,
    KwIf,
    KwElse,
    KwWhile,
    KwDo,
    KwContinue,
    KwSwitch,
    KwBreak,
    KwCase,
    KwDefault,
    KwReturn,
    KwExtern,
    KwGoto,
    KwAuto,
    KwRestrict,
    KwRegister,
    KwConst,
    KwStatic,
    KwVolatile,
    KwInline,
    KwVoid,
    KwUnsigned,
    KwSigned,
    KwChar,
    KwShort,
    KwInt,
    KwLong,
    KwFloat,
    KwDouble,

    // Operators and punctuators
    Add,          // +
    Inc,          // ++
    Sub,          // -
    Dec,          // --
    Mul,          // *
    Div,          // /
    Mod,          // %
    BitAnd,       // &
    And,          // &&
    BitXor,       // ^
    BitOr,        // |
    Or,           // ||
    BitNot,       // ~
    Not,          // !
    Dot,          // .
    Comma,        // ,
    Question,     // ?
    Colon,        // :
    Semicolon,    // ;
    Gt,           // >
    Arrow,        // ->
    Shr,          // >>
    Lt,           // <
    Shl,          // <<
    Assign,       // =
    AddAssign,    // +=
    SubAssign,    // -=
    MulAssign,    // *=
    DivAssign,    // /=
    ModAssign,    // %=
    BitAndAssign, // &=
    BitXorAssign, // ^=
    BitOrAssign,  // |=
    NotEq,        // !=
    GtEq,         // >=
    ShrAssign,    // >>=
    LtEq,         // <=
    ShlAssign,    // <<=
    Eq,           // ==
}

bitflags! {
    /// Coarse classification of a [`SyntaxKind`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct KindFlags: u8 {
        /// Owns a child sequence.
        const GROUP = 1 << 0;
        /// Whitespace, comments and directives.
        const TRIVIA = 1 << 2;
        const KEYWORD = 1 << 3;
        const OPERATOR = 1 << 4;
        /// `for`, `while`, `if`, `else` before they are attached.
        const CONTROL = 1 << 5;
        const BUILTIN_TYPE = 1 << 6;
    }
}

pub const KEYWORDS: [SyntaxKind; 35] = [
    SyntaxKind::KwStruct,
    SyntaxKind::KwEnum,
    SyntaxKind::KwTypedef,
    SyntaxKind::KwUnion,
    SyntaxKind::KwSizeof,
    SyntaxKind::KwOffsetof,
    SyntaxKind::KwFor,
    SyntaxKind::KwIf,
    SyntaxKind::KwElse,
    SyntaxKind::KwWhile,
    SyntaxKind::KwDo,
    SyntaxKind::KwContinue,
    SyntaxKind::KwSwitch,
    SyntaxKind::KwBreak,
    SyntaxKind::KwCase,
    SyntaxKind::KwDefault,
    SyntaxKind::KwReturn,
    SyntaxKind::KwExtern,
    SyntaxKind::KwGoto,
    SyntaxKind::KwAuto,
    SyntaxKind::KwRestrict,
    SyntaxKind::KwRegister,
    SyntaxKind::KwConst,
    SyntaxKind::KwStatic,
    SyntaxKind::KwVolatile,
    SyntaxKind::KwInline,
    SyntaxKind::KwVoid,
    SyntaxKind::KwUnsigned,
    SyntaxKind::KwSigned,
    SyntaxKind::KwChar,
    SyntaxKind::KwShort,
    SyntaxKind::KwInt,
    SyntaxKind::KwLong,
    SyntaxKind::KwFloat,
    SyntaxKind::KwDouble,
];

impl SyntaxKind {
    /// Numeric tag used by the s-expression dump.
    pub fn tag(self) -> u16 {
        self as u16
    }

    pub fn flags(self) -> KindFlags {
        use SyntaxKind::*;
        match self {
            Whitespace | LineComment | BlockComment | Directive => KindFlags::TRIVIA,
            Ident | CharLit | StringLit | StructDecl | TypedefDecl => KindFlags::empty(),
            Parens | Braces | Brackets | Stmt | ForLoop | WhileLoop | If | Else => {
                KindFlags::GROUP
            }
            KwFor | KwIf | KwElse | KwWhile => KindFlags::KEYWORD | KindFlags::CONTROL,
            KwVoid | KwUnsigned | KwSigned | KwChar | KwShort | KwInt | KwLong | KwFloat
            | KwDouble => KindFlags::KEYWORD | KindFlags::BUILTIN_TYPE,
            KwStruct | KwEnum | KwTypedef | KwUnion | KwSizeof | KwOffsetof | KwDo
            | KwContinue | KwSwitch | KwBreak | KwCase | KwDefault | KwReturn | KwExtern
            | KwGoto | KwAuto | KwRestrict | KwRegister | KwConst | KwStatic | KwVolatile
            | KwInline => KindFlags::KEYWORD,
            _ => KindFlags::OPERATOR,
        }
    }

    pub fn is_group(self) -> bool {
        self.flags().contains(KindFlags::GROUP)
    }

    pub fn is_trivia(self) -> bool {
        self.flags().contains(KindFlags::TRIVIA)
    }

    /// Surface spelling of keywords and operators; `None` for kinds whose
    /// spelling lives in the node text or in the group brackets.
    pub fn spelling(self) -> Option<&'static str> {
        use SyntaxKind::*;
        let s = match self {
            KwStruct => "struct",
            KwEnum => "enum",
            KwTypedef => "typedef",
            KwUnion => "union",
            KwSizeof => "sizeof",
            KwOffsetof => "offsetof",
            KwFor => "for",
            KwIf => "if",
            KwElse => "else",
            KwWhile => "while",
            KwDo => "do",
            KwContinue => "continue",
            KwSwitch => "switch",
            KwBreak => "break",
            KwCase => "case",
            KwDefault => "default",
            KwReturn => "return",
            KwExtern => "extern",
            KwGoto => "goto",
            KwAuto => "auto",
            KwRestrict => "restrict",
            KwRegister => "register",
            KwConst => "const",
            KwStatic => "static",
            KwVolatile => "volatile",
            KwInline => "inline",
            KwVoid => "void",
            KwUnsigned => "unsigned",
            KwSigned => "signed",
            KwChar => "char",
            KwShort => "short",
            KwInt => "int",
            KwLong => "long",
            KwFloat => "float",
            KwDouble => "double",

            Add => "+",
            Inc => "++",
            Sub => "-",
            Dec => "--",
            Mul => "*",
            Div => "/",
            Mod => "%",
            BitAnd => "&",
            And => "&&",
            BitXor => "^",
            BitOr => "|",
            Or => "||",
            BitNot => "~",
            Not => "!",
            Dot => ".",
            Comma => ",",
            Question => "?",
            Colon => ":",
            Semicolon => ";",
            Gt => ">",
            Arrow => "->",
            Shr => ">>",
            Lt => "<",
            Shl => "<<",
            Assign => "=",
            AddAssign => "+=",
            SubAssign => "-=",
            MulAssign => "*=",
            DivAssign => "/=",
            ModAssign => "%=",
            BitAndAssign => "&=",
            BitXorAssign => "^=",
            BitOrAssign => "|=",
            NotEq => "!=",
            GtEq => ">=",
            ShrAssign => ">>=",
            LtEq => "<=",
            ShlAssign => "<<=",
            Eq => "==",

            _ => return None,
        };
        Some(s)
    }

    /// The group kind a control keyword turns into once its body is attached.
    pub fn control_group(self) -> Option<SyntaxKind> {
        match self {
            SyntaxKind::KwFor => Some(SyntaxKind::ForLoop),
            SyntaxKind::KwWhile => Some(SyntaxKind::WhileLoop),
            SyntaxKind::KwIf => Some(SyntaxKind::If),
            SyntaxKind::KwElse => Some(SyntaxKind::Else),
            _ => None,
        }
    }
}

/// Operator produced by a single delimiter character, if it is one.
pub fn single_char_operator(c: u8) -> Option<SyntaxKind> {
    use SyntaxKind::*;
    let kind = match c {
        b'+' => Add,
        b'-' => Sub,
        b'*' => Mul,
        b'/' => Div,
        b'%' => Mod,
        b'&' => BitAnd,
        b'^' => BitXor,
        b'|' => BitOr,
        b'~' => BitNot,
        b'!' => Not,
        b'.' => Dot,
        b',' => Comma,
        b'?' => Question,
        b':' => Colon,
        b';' => Semicolon,
        b'>' => Gt,
        b'<' => Lt,
        b'=' => Assign,
        _ => return None,
    };
    Some(kind)
}

/// Longer operator formed when `c` directly follows an operator of kind `prev`.
pub fn merge_operator(prev: SyntaxKind, c: u8) -> Option<SyntaxKind> {
    use SyntaxKind::*;
    let kind = match (prev, c) {
        (Add, b'+') => Inc,
        (Sub, b'-') => Dec,
        (Sub, b'>') => Arrow,
        (BitAnd, b'&') => And,
        (BitOr, b'|') => Or,
        (Lt, b'<') => Shl,
        (Gt, b'>') => Shr,

        (Add, b'=') => AddAssign,
        (Sub, b'=') => SubAssign,
        (Mul, b'=') => MulAssign,
        (Div, b'=') => DivAssign,
        (Mod, b'=') => ModAssign,
        (BitAnd, b'=') => BitAndAssign,
        (BitXor, b'=') => BitXorAssign,
        (BitOr, b'=') => BitOrAssign,
        (Not, b'=') => NotEq,
        (Gt, b'=') => GtEq,
        (Shr, b'=') => ShrAssign,
        (Lt, b'=') => LtEq,
        (Shl, b'=') => ShlAssign,
        (Assign, b'=') => Eq,
        _ => return None,
    };
    Some(kind)
}

/// Keyword lookup built once per transformer run.
#[derive(Debug, Clone)]
pub struct KeywordTable {
    map: FxHashMap<&'static str, SyntaxKind>,
}

impl KeywordTable {
    pub fn new() -> Self {
        let mut map = FxHashMap::default();
        for kind in KEYWORDS {
            if let Some(spelling) = kind.spelling() {
                map.insert(spelling, kind);
            }
        }
        Self { map }
    }

    pub fn lookup(&self, word: &str) -> Option<SyntaxKind> {
        self.map.get(word).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self::new()
    }
}
