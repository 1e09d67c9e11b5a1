use crate::fields::{
    AcctParamsField, AppParamsField, AssetHoldingField, AssetParamsField, Base64Encoding,
    BlockField, EcGroup, EcdsaCurve, GlobalField, JsonRef, TxnField, VrfStandard,
};

/// One parsed source line. The listing keeps a one-to-one correspondence
/// with source lines: blank, comment-only and failed lines all become
/// `Empty` so that listing index equals line index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Empty,
    Label { name: String },
    Pragma { version: u64 },

    // constants
    Int { value: u64 },
    Byte { value: Vec<u8> },
    Addr { address: String },
    Method { signature: String },
    IntcBlock { values: Vec<u64> },
    Intc { index: u8 },
    Intc0,
    Intc1,
    Intc2,
    Intc3,
    BytecBlock { values: Vec<Vec<u8>> },
    Bytec { index: u8 },
    Bytec0,
    Bytec1,
    Bytec2,
    Bytec3,
    PushBytes { value: Vec<u8> },
    PushInt { value: u64 },
    PushBytess { values: Vec<Vec<u8>> },
    PushInts { values: Vec<u64> },

    // crypto
    Sha256,
    Keccak256,
    Sha512_256,
    Sha3_256,
    Ed25519Verify,
    Ed25519VerifyBare,
    EcdsaVerify { curve: EcdsaCurve },
    EcdsaPkDecompress { curve: EcdsaCurve },
    EcdsaPkRecover { curve: EcdsaCurve },
    VrfVerify { standard: VrfStandard },
    EcAdd { group: EcGroup },
    EcScalarMul { group: EcGroup },
    EcPairingCheck { group: EcGroup },
    EcMultiExp { group: EcGroup },
    EcSubgroupCheck { group: EcGroup },
    EcMapTo { group: EcGroup },

    // arithmetic and logic
    Plus,
    Minus,
    Div,
    Mul,
    Lt,
    Gt,
    Le,
    Ge,
    And,
    Or,
    Eq,
    Neq,
    Not,
    Len,
    Itob,
    Btoi,
    Modulo,
    BitOr,
    BitAnd,
    BitXor,
    BitNot,
    Mulw,
    Addw,
    DivModw,
    Shl,
    Shr,
    Sqrt,
    BitLen,
    Exp,
    Expw,
    Bsqrt,
    Divw,

    // byte-array arithmetic
    BytesPlus,
    BytesMinus,
    BytesDiv,
    BytesMul,
    BytesLt,
    BytesGt,
    BytesLe,
    BytesGe,
    BytesEq,
    BytesNeq,
    BytesModulo,
    BytesBitOr,
    BytesBitAnd,
    BytesBitXor,
    BytesBitNot,
    Bzero,

    // stack manipulation
    Pop,
    Dup,
    Dup2,
    Dig { depth: u8 },
    Swap,
    Select,
    Cover { depth: u8 },
    Uncover { depth: u8 },
    Bury { depth: u8 },
    PopN { count: u8 },
    DupN { count: u8 },

    // byte slicing
    Concat,
    Substring { start: u8, end: u8 },
    Substring3,
    GetBit,
    SetBit,
    GetByte,
    SetByte,
    Extract { start: u8, length: u8 },
    Extract3,
    ExtractUint16,
    ExtractUint32,
    ExtractUint64,
    Replace2 { start: u8 },
    Replace3,
    Base64Decode { encoding: Base64Encoding },
    JsonRef { kind: JsonRef },

    // transaction and state access
    Arg { index: u8 },
    Arg0,
    Arg1,
    Arg2,
    Arg3,
    Args,
    Txn { field: TxnField },
    Txna { field: TxnField, index: u8 },
    Txnas { field: TxnField },
    Gtxn { group: u8, field: TxnField },
    Gtxna { group: u8, field: TxnField, index: u8 },
    Gtxnas { group: u8, field: TxnField },
    Gtxns { field: TxnField },
    Gtxnsa { field: TxnField, index: u8 },
    Gtxnsas { field: TxnField },
    Global { field: GlobalField },
    Load { index: u8 },
    Store { index: u8 },
    Loads,
    Stores,
    Gload { group: u8, index: u8 },
    Gloads { index: u8 },
    Gloadss,
    Gaid { group: u8 },
    Gaids,
    Balance,
    MinBalance,
    AppOptedIn,
    AppLocalGet,
    AppLocalGetEx,
    AppGlobalGet,
    AppGlobalGetEx,
    AppLocalPut,
    AppGlobalPut,
    AppLocalDel,
    AppGlobalDel,
    AssetHoldingGet { field: AssetHoldingField },
    AssetParamsGet { field: AssetParamsField },
    AppParamsGet { field: AppParamsField },
    AcctParamsGet { field: AcctParamsField },
    Log,
    Block { field: BlockField },

    // inner transactions
    ItxnBegin,
    ItxnField { field: TxnField },
    ItxnSubmit,
    ItxnNext,
    Itxn { field: TxnField },
    Itxna { field: TxnField, index: u8 },
    Itxnas { field: TxnField },
    Gitxn { group: u8, field: TxnField },
    Gitxna { group: u8, field: TxnField, index: u8 },
    Gitxnas { group: u8, field: TxnField },

    // boxes
    BoxCreate,
    BoxExtract,
    BoxReplace,
    BoxDel,
    BoxLen,
    BoxGet,
    BoxPut,

    // control flow
    Err,
    Bnz { target: String },
    Bz { target: String },
    Branch { target: String },
    Return,
    Assert,
    CallSub { target: String },
    RetSub,
    Proto { args: u8, results: u8 },
    FrameDig { index: i8 },
    FrameBury { index: i8 },
    Switch { targets: Vec<String> },
    Match { targets: Vec<String> },
}

pub type Listing = Vec<Op>;

impl Op {
    /// Outgoing label references of this operation.
    pub fn label_refs(&self) -> &[String] {
        match self {
            Op::Bnz { target }
            | Op::Bz { target }
            | Op::Branch { target }
            | Op::CallSub { target } => std::slice::from_ref(target),
            Op::Switch { targets } | Op::Match { targets } => targets,
            _ => &[],
        }
    }

    /// True if execution cannot fall through to the next line.
    pub fn is_terminator(&self) -> bool {
        matches!(self, Op::Branch { .. } | Op::Return | Op::RetSub | Op::Err)
    }

    /// True for listing entries invisible to control flow.
    pub fn is_nop(&self) -> bool {
        matches!(self, Op::Empty | Op::Label { .. } | Op::Pragma { .. })
    }

    /// Target of an unconditional branch, if this is one.
    pub fn branch_target(&self) -> Option<&str> {
        match self {
            Op::Branch { target } => Some(target),
            _ => None,
        }
    }
}
