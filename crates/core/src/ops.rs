use std::fmt;
use std::sync::LazyLock;

use indexmap::IndexMap;

use crate::ast::Op;
use crate::docs;
use crate::fields::{
    AcctParamsField, AppParamsField, AssetHoldingField, AssetParamsField, Base64Encoding,
    BlockField, EcGroup, EcdsaCurve, FieldEnum, FieldSpec, GlobalField, JsonRef, TxnField,
    VrfStandard, parse_uint64,
};

/// Program execution context. Applications run as smart contracts,
/// logic signatures authorise transactions; the opcode sets differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    App,
    Sig,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::App => write!(f, "application"),
            Mode::Sig => write!(f, "logicsig"),
        }
    }
}

/// Marker for an aborted line parse. The context that raised it has
/// already recorded a diagnostic; callers unwind with `?` and recover at
/// the line boundary.
#[derive(Debug, Clone, Copy)]
pub struct LineAbort;

pub type ParseResult<T> = Result<T, LineAbort>;

pub type ParseFn = fn(&mut dyn OpContext) -> ParseResult<()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgType {
    ConstInt,
    Uint64,
    Uint8,
    Int8,
    Bytes,
    Label,
    Addr,
    Signature,
    PragmaName,
    TxnField,
    ItxnField,
    TxnaField,
    GlobalField,
    JsonRef,
    EcdsaCurve,
    AssetHoldingField,
    AssetParamsField,
    AppParamsField,
    AcctParamsField,
    VrfStandard,
    Base64Encoding,
    BlockField,
    EcGroupField,
}

impl ArgType {
    pub fn describe(self) -> &'static str {
        match self {
            ArgType::ConstInt | ArgType::Uint64 => "uint64",
            ArgType::Uint8 => "uint8",
            ArgType::Int8 => "int8",
            ArgType::Bytes => "bytes",
            ArgType::Label => "label name",
            ArgType::Addr => "address",
            ArgType::Signature => "signature",
            ArgType::PragmaName => "pragma name",
            ArgType::TxnField => "transaction field index",
            ArgType::ItxnField => "internal transaction field index",
            ArgType::TxnaField => "transaction array field index",
            ArgType::GlobalField => "global field index",
            ArgType::JsonRef => "json_ref",
            ArgType::EcdsaCurve => "ECDSA Curve",
            ArgType::AssetHoldingField => "asset holding field index",
            ArgType::AssetParamsField => "asset params field index",
            ArgType::AppParamsField => "app params field index",
            ArgType::AcctParamsField => "account params field index",
            ArgType::VrfStandard => "parameters index",
            ArgType::Base64Encoding => "base64 encoding",
            ArgType::BlockField => "block field",
            ArgType::EcGroupField => "EC group field index",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgSpec {
    pub name: &'static str,
    pub ty: ArgType,
    pub optional: bool,
    pub array: bool,
}

/// Catalog entry for one opcode. A mode minimum version of 0 means the
/// opcode is unavailable in that mode.
pub struct OpSpec {
    pub name: &'static str,
    pub sig_version: u64,
    pub app_version: u64,
    pub args: Vec<ArgSpec>,
    pub args_sig: String,
    pub full_sig: String,
    pub parse: ParseFn,
    pub doc: &'static str,
    pub full_doc: String,
}

impl OpSpec {
    pub fn min_version(&self, mode: Mode) -> u64 {
        match mode {
            Mode::App => self.app_version,
            Mode::Sig => self.sig_version,
        }
    }
}

impl fmt::Debug for OpSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpSpec")
            .field("name", &self.name)
            .field("sig_version", &self.sig_version)
            .field("app_version", &self.app_version)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

/// Capability interface an opcode's parse function runs against. The
/// parser implements it by consuming line tokens; the schema recorder
/// implements it by accumulating argument descriptors, which keeps the
/// opcode list the single source of truth for parsing, documentation,
/// completion and version checks.
pub trait OpContext {
    fn emit(&mut self, op: Op);
    fn min_version(&mut self, version: u64);
    fn mode_min_version(&mut self, mode: Mode, version: u64);

    fn must_read_pragma(&mut self, name: &'static str) -> ParseResult<u64>;
    fn must_read_addr(&mut self, name: &'static str) -> ParseResult<String>;
    fn must_read_signature(&mut self, name: &'static str) -> ParseResult<String>;
    fn must_read_label(&mut self, name: &'static str) -> ParseResult<String>;
    fn must_read_bytes(&mut self, name: &'static str) -> ParseResult<Vec<u8>>;
    fn must_read_uint64(&mut self, name: &'static str) -> ParseResult<u64>;
    fn must_read_const_int(&mut self, name: &'static str) -> ParseResult<u64>;
    fn must_read_uint8(&mut self, name: &'static str) -> ParseResult<u8>;
    fn maybe_read_uint8(&mut self, name: &'static str) -> ParseResult<Option<u8>>;
    fn must_read_int8(&mut self, name: &'static str) -> ParseResult<i8>;

    fn must_read_txn_field(&mut self, name: &'static str) -> ParseResult<TxnField>;
    fn must_read_txna_field(&mut self, name: &'static str) -> ParseResult<TxnField>;
    fn must_read_itxn_field(&mut self, name: &'static str) -> ParseResult<TxnField>;
    fn must_read_global_field(&mut self, name: &'static str) -> ParseResult<GlobalField>;
    fn must_read_asset_holding_field(&mut self, name: &'static str)
    -> ParseResult<AssetHoldingField>;
    fn must_read_asset_params_field(&mut self, name: &'static str)
    -> ParseResult<AssetParamsField>;
    fn must_read_app_params_field(&mut self, name: &'static str) -> ParseResult<AppParamsField>;
    fn must_read_acct_params_field(&mut self, name: &'static str) -> ParseResult<AcctParamsField>;
    fn must_read_json_ref(&mut self, name: &'static str) -> ParseResult<JsonRef>;
    fn must_read_ecdsa_curve(&mut self, name: &'static str) -> ParseResult<EcdsaCurve>;
    fn must_read_vrf_standard(&mut self, name: &'static str) -> ParseResult<VrfStandard>;
    fn must_read_base64_encoding(&mut self, name: &'static str) -> ParseResult<Base64Encoding>;
    fn must_read_block_field(&mut self, name: &'static str) -> ParseResult<BlockField>;
    fn must_read_ec_group(&mut self, name: &'static str) -> ParseResult<EcGroup>;

    fn read_uint64_array(&mut self, name: &'static str) -> ParseResult<Vec<u64>>;
    fn read_bytes_array(&mut self, name: &'static str) -> ParseResult<Vec<Vec<u8>>>;
    fn read_labels_array(&mut self, name: &'static str) -> ParseResult<Vec<String>>;
}

/// Replays parse functions to record their argument schema instead of
/// consuming tokens. Never aborts.
#[derive(Debug)]
struct SchemaContext {
    args: Vec<ArgSpec>,
    sig_version: u64,
    app_version: u64,
    optional: bool,
}

impl SchemaContext {
    fn new() -> Self {
        Self {
            args: Vec::new(),
            sig_version: 1,
            app_version: 1,
            optional: false,
        }
    }

    fn record(&mut self, mut arg: ArgSpec) {
        // Once one optional argument is seen, everything after it is
        // optional as well.
        if self.optional {
            arg.optional = true;
        } else if arg.optional {
            self.optional = true;
        }
        self.args.push(arg);
    }

    fn plain(&mut self, name: &'static str, ty: ArgType) {
        self.record(ArgSpec {
            name,
            ty,
            optional: false,
            array: false,
        });
    }

    fn array(&mut self, name: &'static str, ty: ArgType) {
        self.record(ArgSpec {
            name,
            ty,
            optional: false,
            array: true,
        });
    }
}

impl OpContext for SchemaContext {
    fn emit(&mut self, _op: Op) {}

    fn min_version(&mut self, version: u64) {
        self.sig_version = version;
        self.app_version = version;
    }

    fn mode_min_version(&mut self, mode: Mode, version: u64) {
        match mode {
            Mode::App => self.app_version = version,
            Mode::Sig => self.sig_version = version,
        }
    }

    fn must_read_pragma(&mut self, name: &'static str) -> ParseResult<u64> {
        self.plain(name, ArgType::PragmaName);
        self.plain(name, ArgType::Uint8);
        Ok(0)
    }

    fn must_read_addr(&mut self, name: &'static str) -> ParseResult<String> {
        self.plain(name, ArgType::Addr);
        Ok(String::new())
    }

    fn must_read_signature(&mut self, name: &'static str) -> ParseResult<String> {
        self.plain(name, ArgType::Signature);
        Ok(String::new())
    }

    fn must_read_label(&mut self, name: &'static str) -> ParseResult<String> {
        self.plain(name, ArgType::Label);
        Ok(String::new())
    }

    fn must_read_bytes(&mut self, name: &'static str) -> ParseResult<Vec<u8>> {
        self.plain(name, ArgType::Bytes);
        Ok(Vec::new())
    }

    fn must_read_uint64(&mut self, name: &'static str) -> ParseResult<u64> {
        self.plain(name, ArgType::Uint64);
        Ok(0)
    }

    fn must_read_const_int(&mut self, name: &'static str) -> ParseResult<u64> {
        self.plain(name, ArgType::ConstInt);
        Ok(0)
    }

    fn must_read_uint8(&mut self, name: &'static str) -> ParseResult<u8> {
        self.plain(name, ArgType::Uint8);
        Ok(0)
    }

    fn maybe_read_uint8(&mut self, name: &'static str) -> ParseResult<Option<u8>> {
        self.record(ArgSpec {
            name,
            ty: ArgType::Uint8,
            optional: true,
            array: false,
        });
        // Pretend the argument was present so the rest of the schema is
        // recorded too.
        Ok(Some(0))
    }

    fn must_read_int8(&mut self, name: &'static str) -> ParseResult<i8> {
        self.plain(name, ArgType::Int8);
        Ok(0)
    }

    fn must_read_txn_field(&mut self, name: &'static str) -> ParseResult<TxnField> {
        self.plain(name, ArgType::TxnField);
        Ok(TxnField::Sender)
    }

    fn must_read_txna_field(&mut self, name: &'static str) -> ParseResult<TxnField> {
        self.plain(name, ArgType::TxnaField);
        Ok(TxnField::ApplicationArgs)
    }

    fn must_read_itxn_field(&mut self, name: &'static str) -> ParseResult<TxnField> {
        self.plain(name, ArgType::ItxnField);
        Ok(TxnField::Sender)
    }

    fn must_read_global_field(&mut self, name: &'static str) -> ParseResult<GlobalField> {
        self.plain(name, ArgType::GlobalField);
        Ok(GlobalField::MinTxnFee)
    }

    fn must_read_asset_holding_field(
        &mut self,
        name: &'static str,
    ) -> ParseResult<AssetHoldingField> {
        self.plain(name, ArgType::AssetHoldingField);
        Ok(AssetHoldingField::AssetBalance)
    }

    fn must_read_asset_params_field(
        &mut self,
        name: &'static str,
    ) -> ParseResult<AssetParamsField> {
        self.plain(name, ArgType::AssetParamsField);
        Ok(AssetParamsField::AssetTotal)
    }

    fn must_read_app_params_field(&mut self, name: &'static str) -> ParseResult<AppParamsField> {
        self.plain(name, ArgType::AppParamsField);
        Ok(AppParamsField::AppApprovalProgram)
    }

    fn must_read_acct_params_field(&mut self, name: &'static str) -> ParseResult<AcctParamsField> {
        self.plain(name, ArgType::AcctParamsField);
        Ok(AcctParamsField::AcctBalance)
    }

    fn must_read_json_ref(&mut self, name: &'static str) -> ParseResult<JsonRef> {
        self.plain(name, ArgType::JsonRef);
        Ok(JsonRef::JSONString)
    }

    fn must_read_ecdsa_curve(&mut self, name: &'static str) -> ParseResult<EcdsaCurve> {
        self.plain(name, ArgType::EcdsaCurve);
        Ok(EcdsaCurve::Secp256k1)
    }

    fn must_read_vrf_standard(&mut self, name: &'static str) -> ParseResult<VrfStandard> {
        self.plain(name, ArgType::VrfStandard);
        Ok(VrfStandard::VrfAlgorand)
    }

    fn must_read_base64_encoding(&mut self, name: &'static str) -> ParseResult<Base64Encoding> {
        self.plain(name, ArgType::Base64Encoding);
        Ok(Base64Encoding::URLEncoding)
    }

    fn must_read_block_field(&mut self, name: &'static str) -> ParseResult<BlockField> {
        self.plain(name, ArgType::BlockField);
        Ok(BlockField::BlkSeed)
    }

    fn must_read_ec_group(&mut self, name: &'static str) -> ParseResult<EcGroup> {
        self.plain(name, ArgType::EcGroupField);
        Ok(EcGroup::BN254g1)
    }

    fn read_uint64_array(&mut self, name: &'static str) -> ParseResult<Vec<u64>> {
        self.array(name, ArgType::Uint64);
        Ok(Vec::new())
    }

    fn read_bytes_array(&mut self, name: &'static str) -> ParseResult<Vec<Vec<u8>>> {
        self.array(name, ArgType::Bytes);
        Ok(Vec::new())
    }

    fn read_labels_array(&mut self, name: &'static str) -> ParseResult<Vec<String>> {
        self.array(name, ArgType::Label);
        Ok(Vec::new())
    }
}

pub(crate) fn op_pragma(c: &mut dyn OpContext) -> ParseResult<()> {
    let version = c.must_read_pragma("version")?;
    c.emit(Op::Pragma { version });
    Ok(())
}

fn op_addr(c: &mut dyn OpContext) -> ParseResult<()> {
    let address = c.must_read_addr("address")?;
    c.emit(Op::Addr { address });
    Ok(())
}

fn op_byte(c: &mut dyn OpContext) -> ParseResult<()> {
    let value = c.must_read_bytes("value")?;
    c.emit(Op::Byte { value });
    Ok(())
}

fn op_int(c: &mut dyn OpContext) -> ParseResult<()> {
    let value = c.must_read_const_int("value")?;
    c.emit(Op::Int { value });
    Ok(())
}

fn op_method(c: &mut dyn OpContext) -> ParseResult<()> {
    let signature = c.must_read_signature("signature")?;
    c.emit(Op::Method { signature });
    Ok(())
}

fn op_err(c: &mut dyn OpContext) -> ParseResult<()> {
    c.emit(Op::Err);
    Ok(())
}

fn op_sha256(c: &mut dyn OpContext) -> ParseResult<()> {
    c.min_version(1);
    c.emit(Op::Sha256);
    Ok(())
}

fn op_keccak256(c: &mut dyn OpContext) -> ParseResult<()> {
    c.min_version(1);
    c.emit(Op::Keccak256);
    Ok(())
}

fn op_sha512_256(c: &mut dyn OpContext) -> ParseResult<()> {
    c.min_version(1);
    c.emit(Op::Sha512_256);
    Ok(())
}

fn op_ed25519verify(c: &mut dyn OpContext) -> ParseResult<()> {
    c.mode_min_version(Mode::Sig, 1);
    c.mode_min_version(Mode::App, 5);
    c.emit(Op::Ed25519Verify);
    Ok(())
}

fn op_ecdsa_verify(c: &mut dyn OpContext) -> ParseResult<()> {
    c.min_version(5);
    let curve = c.must_read_ecdsa_curve("curve index")?;
    c.emit(Op::EcdsaVerify { curve });
    Ok(())
}

fn op_ecdsa_pk_decompress(c: &mut dyn OpContext) -> ParseResult<()> {
    c.min_version(5);
    let curve = c.must_read_ecdsa_curve("curve index")?;
    c.emit(Op::EcdsaPkDecompress { curve });
    Ok(())
}

fn op_ecdsa_pk_recover(c: &mut dyn OpContext) -> ParseResult<()> {
    c.min_version(5);
    let curve = c.must_read_ecdsa_curve("curve index")?;
    c.emit(Op::EcdsaPkRecover { curve });
    Ok(())
}

macro_rules! simple_ops {
    ( $( $fn_name:ident , $min:literal , $op:expr ; )+ ) => {
        $(
            fn $fn_name(c: &mut dyn OpContext) -> ParseResult<()> {
                c.min_version($min);
                c.emit($op);
                Ok(())
            }
        )+
    };
}

simple_ops! {
    op_plus, 1, Op::Plus;
    op_minus, 1, Op::Minus;
    op_div, 1, Op::Div;
    op_mul, 1, Op::Mul;
    op_lt, 1, Op::Lt;
    op_gt, 1, Op::Gt;
    op_le, 1, Op::Le;
    op_ge, 1, Op::Ge;
    op_and, 1, Op::And;
    op_or, 1, Op::Or;
    op_eq, 1, Op::Eq;
    op_neq, 1, Op::Neq;
    op_not, 1, Op::Not;
    op_len, 1, Op::Len;
    op_itob, 1, Op::Itob;
    op_btoi, 1, Op::Btoi;
    op_modulo, 1, Op::Modulo;
    op_bit_or, 1, Op::BitOr;
    op_bit_and, 1, Op::BitAnd;
    op_bit_xor, 1, Op::BitXor;
    op_bit_not, 1, Op::BitNot;
    op_mulw, 1, Op::Mulw;
    op_addw, 2, Op::Addw;
    op_divmodw, 4, Op::DivModw;
    op_intc_0, 1, Op::Intc0;
    op_intc_1, 1, Op::Intc1;
    op_intc_2, 1, Op::Intc2;
    op_intc_3, 1, Op::Intc3;
    op_bytec_0, 1, Op::Bytec0;
    op_bytec_1, 1, Op::Bytec1;
    op_bytec_2, 1, Op::Bytec2;
    op_bytec_3, 1, Op::Bytec3;
    op_loads, 5, Op::Loads;
    op_stores, 5, Op::Stores;
    op_return, 2, Op::Return;
    op_assert, 3, Op::Assert;
    op_pop, 1, Op::Pop;
    op_dup, 1, Op::Dup;
    op_dup2, 2, Op::Dup2;
    op_swap, 3, Op::Swap;
    op_select, 3, Op::Select;
    op_concat, 2, Op::Concat;
    op_substring3, 2, Op::Substring3;
    op_getbit, 3, Op::GetBit;
    op_setbit, 3, Op::SetBit;
    op_getbyte, 3, Op::GetByte;
    op_setbyte, 3, Op::SetByte;
    op_extract3, 5, Op::Extract3;
    op_extract_uint16, 5, Op::ExtractUint16;
    op_extract_uint32, 5, Op::ExtractUint32;
    op_extract_uint64, 5, Op::ExtractUint64;
    op_replace3, 7, Op::Replace3;
    op_ed25519verify_bare, 7, Op::Ed25519VerifyBare;
    op_retsub, 4, Op::RetSub;
    op_shl, 4, Op::Shl;
    op_shr, 4, Op::Shr;
    op_sqrt, 4, Op::Sqrt;
    op_bitlen, 4, Op::BitLen;
    op_exp, 4, Op::Exp;
    op_expw, 4, Op::Expw;
    op_bsqrt, 6, Op::Bsqrt;
    op_divw, 6, Op::Divw;
    op_sha3_256, 7, Op::Sha3_256;
    op_bytes_plus, 4, Op::BytesPlus;
    op_bytes_minus, 4, Op::BytesMinus;
    op_bytes_div, 4, Op::BytesDiv;
    op_bytes_mul, 4, Op::BytesMul;
    op_bytes_lt, 4, Op::BytesLt;
    op_bytes_gt, 4, Op::BytesGt;
    op_bytes_le, 4, Op::BytesLe;
    op_bytes_ge, 4, Op::BytesGe;
    op_bytes_eq, 4, Op::BytesEq;
    op_bytes_neq, 4, Op::BytesNeq;
    op_bytes_modulo, 4, Op::BytesModulo;
    op_bytes_bit_or, 4, Op::BytesBitOr;
    op_bytes_bit_and, 4, Op::BytesBitAnd;
    op_bytes_bit_xor, 4, Op::BytesBitXor;
    op_bytes_bit_not, 4, Op::BytesBitNot;
    op_bzero, 4, Op::Bzero;
}

macro_rules! app_only_ops {
    ( $( $fn_name:ident , $min:literal , $op:expr ; )+ ) => {
        $(
            fn $fn_name(c: &mut dyn OpContext) -> ParseResult<()> {
                c.mode_min_version(Mode::Sig, 0);
                c.mode_min_version(Mode::App, $min);
                c.emit($op);
                Ok(())
            }
        )+
    };
}

app_only_ops! {
    op_gaids, 4, Op::Gaids;
    op_balance, 2, Op::Balance;
    op_app_opted_in, 2, Op::AppOptedIn;
    op_app_local_get, 2, Op::AppLocalGet;
    op_app_local_get_ex, 2, Op::AppLocalGetEx;
    op_app_global_get, 2, Op::AppGlobalGet;
    op_app_global_get_ex, 2, Op::AppGlobalGetEx;
    op_app_local_put, 2, Op::AppLocalPut;
    op_app_global_put, 2, Op::AppGlobalPut;
    op_app_local_del, 2, Op::AppLocalDel;
    op_app_global_del, 2, Op::AppGlobalDel;
    op_min_balance, 3, Op::MinBalance;
    op_log, 5, Op::Log;
    op_itxn_begin, 5, Op::ItxnBegin;
    op_itxn_submit, 5, Op::ItxnSubmit;
    op_itxn_next, 6, Op::ItxnNext;
    op_box_create, 8, Op::BoxCreate;
    op_box_extract, 8, Op::BoxExtract;
    op_box_replace, 8, Op::BoxReplace;
    op_box_del, 8, Op::BoxDel;
    op_box_len, 8, Op::BoxLen;
    op_box_get, 8, Op::BoxGet;
    op_box_put, 8, Op::BoxPut;
    op_args, 5, Op::Args;
    op_gloadss, 6, Op::Gloadss;
}

fn op_intcblock(c: &mut dyn OpContext) -> ParseResult<()> {
    let values = c.read_uint64_array("value")?;
    c.emit(Op::IntcBlock { values });
    Ok(())
}

fn op_intc(c: &mut dyn OpContext) -> ParseResult<()> {
    let index = c.must_read_uint8("value")?;
    c.emit(Op::Intc { index });
    Ok(())
}

fn op_bytecblock(c: &mut dyn OpContext) -> ParseResult<()> {
    let values = c.read_bytes_array("bytes")?;
    c.emit(Op::BytecBlock { values });
    Ok(())
}

fn op_bytec(c: &mut dyn OpContext) -> ParseResult<()> {
    let index = c.must_read_uint8("index")?;
    c.emit(Op::Bytec { index });
    Ok(())
}

fn op_arg(c: &mut dyn OpContext) -> ParseResult<()> {
    c.mode_min_version(Mode::Sig, 1);
    c.mode_min_version(Mode::App, 0);
    let index = c.must_read_uint8("index")?;
    c.emit(Op::Arg { index });
    Ok(())
}

macro_rules! sig_only_shortcuts {
    ( $( $fn_name:ident , $op:expr ; )+ ) => {
        $(
            fn $fn_name(c: &mut dyn OpContext) -> ParseResult<()> {
                c.mode_min_version(Mode::Sig, 1);
                c.mode_min_version(Mode::App, 0);
                c.emit($op);
                Ok(())
            }
        )+
    };
}

sig_only_shortcuts! {
    op_arg_0, Op::Arg0;
    op_arg_1, Op::Arg1;
    op_arg_2, Op::Arg2;
    op_arg_3, Op::Arg3;
}

fn op_txn(c: &mut dyn OpContext) -> ParseResult<()> {
    let field = c.must_read_txn_field("f")?;
    match c.maybe_read_uint8("i")? {
        Some(index) => c.emit(Op::Txna { field, index }),
        None => c.emit(Op::Txn { field }),
    }
    Ok(())
}

fn op_global(c: &mut dyn OpContext) -> ParseResult<()> {
    let field = c.must_read_global_field("field")?;
    c.emit(Op::Global { field });
    Ok(())
}

fn op_gtxn(c: &mut dyn OpContext) -> ParseResult<()> {
    let group = c.must_read_uint8("t")?;
    let field = c.must_read_txn_field("f")?;
    match c.maybe_read_uint8("i")? {
        Some(index) => c.emit(Op::Gtxna {
            group,
            field,
            index,
        }),
        None => c.emit(Op::Gtxn { group, field }),
    }
    Ok(())
}

fn op_load(c: &mut dyn OpContext) -> ParseResult<()> {
    let index = c.must_read_uint8("i")?;
    c.emit(Op::Load { index });
    Ok(())
}

fn op_store(c: &mut dyn OpContext) -> ParseResult<()> {
    let index = c.must_read_uint8("i")?;
    c.emit(Op::Store { index });
    Ok(())
}

fn op_txna(c: &mut dyn OpContext) -> ParseResult<()> {
    c.min_version(2);
    let field = c.must_read_txna_field("f")?;
    let index = c.must_read_uint8("i")?;
    c.emit(Op::Txna { field, index });
    Ok(())
}

fn op_gtxna(c: &mut dyn OpContext) -> ParseResult<()> {
    c.min_version(2);
    let group = c.must_read_uint8("t")?;
    let field = c.must_read_txna_field("f")?;
    let index = c.must_read_uint8("i")?;
    c.emit(Op::Gtxna {
        group,
        field,
        index,
    });
    Ok(())
}

fn op_gtxns(c: &mut dyn OpContext) -> ParseResult<()> {
    c.min_version(3);
    let field = c.must_read_txn_field("f")?;
    match c.maybe_read_uint8("i")? {
        Some(index) => c.emit(Op::Gtxnsa { field, index }),
        None => c.emit(Op::Gtxns { field }),
    }
    Ok(())
}

fn op_gtxnsa(c: &mut dyn OpContext) -> ParseResult<()> {
    c.min_version(3);
    let field = c.must_read_txna_field("f")?;
    let index = c.must_read_uint8("i")?;
    c.emit(Op::Gtxnsa { field, index });
    Ok(())
}

fn op_gload(c: &mut dyn OpContext) -> ParseResult<()> {
    c.mode_min_version(Mode::Sig, 0);
    c.mode_min_version(Mode::App, 4);
    let group = c.must_read_uint8("t")?;
    let index = c.must_read_uint8("i")?;
    c.emit(Op::Gload { group, index });
    Ok(())
}

fn op_gloads(c: &mut dyn OpContext) -> ParseResult<()> {
    c.mode_min_version(Mode::Sig, 0);
    c.mode_min_version(Mode::App, 4);
    let index = c.must_read_uint8("i")?;
    c.emit(Op::Gloads { index });
    Ok(())
}

fn op_gaid(c: &mut dyn OpContext) -> ParseResult<()> {
    c.mode_min_version(Mode::Sig, 0);
    c.mode_min_version(Mode::App, 4);
    let group = c.must_read_uint8("t")?;
    c.emit(Op::Gaid { group });
    Ok(())
}

fn op_bnz(c: &mut dyn OpContext) -> ParseResult<()> {
    let target = c.must_read_label("label")?;
    c.emit(Op::Bnz { target });
    Ok(())
}

fn op_bz(c: &mut dyn OpContext) -> ParseResult<()> {
    c.min_version(2);
    let target = c.must_read_label("label")?;
    c.emit(Op::Bz { target });
    Ok(())
}

fn op_b(c: &mut dyn OpContext) -> ParseResult<()> {
    c.min_version(2);
    let target = c.must_read_label("label")?;
    c.emit(Op::Branch { target });
    Ok(())
}

fn op_bury(c: &mut dyn OpContext) -> ParseResult<()> {
    c.min_version(8);
    let depth = c.must_read_uint8("n")?;
    c.emit(Op::Bury { depth });
    Ok(())
}

fn op_popn(c: &mut dyn OpContext) -> ParseResult<()> {
    c.min_version(8);
    let count = c.must_read_uint8("n")?;
    c.emit(Op::PopN { count });
    Ok(())
}

fn op_dupn(c: &mut dyn OpContext) -> ParseResult<()> {
    c.min_version(8);
    let count = c.must_read_uint8("n")?;
    c.emit(Op::DupN { count });
    Ok(())
}

fn op_dig(c: &mut dyn OpContext) -> ParseResult<()> {
    c.min_version(3);
    let depth = c.must_read_uint8("n")?;
    c.emit(Op::Dig { depth });
    Ok(())
}

fn op_cover(c: &mut dyn OpContext) -> ParseResult<()> {
    c.min_version(5);
    let depth = c.must_read_uint8("n")?;
    c.emit(Op::Cover { depth });
    Ok(())
}

fn op_uncover(c: &mut dyn OpContext) -> ParseResult<()> {
    c.min_version(5);
    let depth = c.must_read_uint8("index")?;
    c.emit(Op::Uncover { depth });
    Ok(())
}

fn op_substring(c: &mut dyn OpContext) -> ParseResult<()> {
    c.min_version(2);
    let start = c.must_read_uint8("s")?;
    let end = c.must_read_uint8("e")?;
    c.emit(Op::Substring { start, end });
    Ok(())
}

fn op_replace(c: &mut dyn OpContext) -> ParseResult<()> {
    c.min_version(7);
    match c.maybe_read_uint8("s")? {
        Some(start) => c.emit(Op::Replace2 { start }),
        None => c.emit(Op::Replace3),
    }
    Ok(())
}

fn op_extract(c: &mut dyn OpContext) -> ParseResult<()> {
    c.min_version(5);
    match c.maybe_read_uint8("s")? {
        Some(start) => {
            let length = c.must_read_uint8("l")?;
            c.emit(Op::Extract { start, length });
        }
        None => c.emit(Op::Extract3),
    }
    Ok(())
}

fn op_replace2(c: &mut dyn OpContext) -> ParseResult<()> {
    c.min_version(7);
    let start = c.must_read_uint8("s")?;
    c.emit(Op::Replace2 { start });
    Ok(())
}

fn op_base64_decode(c: &mut dyn OpContext) -> ParseResult<()> {
    c.min_version(7);
    let encoding = c.must_read_base64_encoding("e")?;
    c.emit(Op::Base64Decode { encoding });
    Ok(())
}

fn op_json_ref(c: &mut dyn OpContext) -> ParseResult<()> {
    c.min_version(7);
    let kind = c.must_read_json_ref("r")?;
    c.emit(Op::JsonRef { kind });
    Ok(())
}

fn op_asset_holding_get(c: &mut dyn OpContext) -> ParseResult<()> {
    c.mode_min_version(Mode::Sig, 0);
    c.mode_min_version(Mode::App, 2);
    let field = c.must_read_asset_holding_field("f")?;
    c.emit(Op::AssetHoldingGet { field });
    Ok(())
}

fn op_asset_params_get(c: &mut dyn OpContext) -> ParseResult<()> {
    c.mode_min_version(Mode::Sig, 0);
    c.mode_min_version(Mode::App, 2);
    let field = c.must_read_asset_params_field("f")?;
    c.emit(Op::AssetParamsGet { field });
    Ok(())
}

fn op_app_params_get(c: &mut dyn OpContext) -> ParseResult<()> {
    c.mode_min_version(Mode::Sig, 0);
    c.mode_min_version(Mode::App, 5);
    let field = c.must_read_app_params_field("f")?;
    c.emit(Op::AppParamsGet { field });
    Ok(())
}

fn op_acct_params_get(c: &mut dyn OpContext) -> ParseResult<()> {
    c.mode_min_version(Mode::Sig, 0);
    c.mode_min_version(Mode::App, 6);
    let field = c.must_read_acct_params_field("f")?;
    c.emit(Op::AcctParamsGet { field });
    Ok(())
}

fn op_pushbytes(c: &mut dyn OpContext) -> ParseResult<()> {
    c.min_version(3);
    let value = c.must_read_bytes("value")?;
    c.emit(Op::PushBytes { value });
    Ok(())
}

fn op_pushint(c: &mut dyn OpContext) -> ParseResult<()> {
    c.min_version(3);
    let value = c.must_read_uint64("value")?;
    c.emit(Op::PushInt { value });
    Ok(())
}

fn op_pushbytess(c: &mut dyn OpContext) -> ParseResult<()> {
    c.min_version(8);
    let values = c.read_bytes_array("value")?;
    c.emit(Op::PushBytess { values });
    Ok(())
}

fn op_pushints(c: &mut dyn OpContext) -> ParseResult<()> {
    c.min_version(8);
    let values = c.read_uint64_array("value")?;
    c.emit(Op::PushInts { values });
    Ok(())
}

fn op_callsub(c: &mut dyn OpContext) -> ParseResult<()> {
    c.min_version(4);
    let target = c.must_read_label("label")?;
    c.emit(Op::CallSub { target });
    Ok(())
}

fn op_proto(c: &mut dyn OpContext) -> ParseResult<()> {
    c.min_version(8);
    let args = c.must_read_uint8("a")?;
    let results = c.must_read_uint8("r")?;
    c.emit(Op::Proto { args, results });
    Ok(())
}

fn op_frame_dig(c: &mut dyn OpContext) -> ParseResult<()> {
    c.min_version(8);
    let index = c.must_read_int8("index")?;
    c.emit(Op::FrameDig { index });
    Ok(())
}

fn op_frame_bury(c: &mut dyn OpContext) -> ParseResult<()> {
    c.min_version(8);
    let index = c.must_read_int8("index")?;
    c.emit(Op::FrameBury { index });
    Ok(())
}

fn op_switch(c: &mut dyn OpContext) -> ParseResult<()> {
    c.min_version(8);
    let targets = c.read_labels_array("label")?;
    c.emit(Op::Switch { targets });
    Ok(())
}

fn op_match(c: &mut dyn OpContext) -> ParseResult<()> {
    c.min_version(8);
    let targets = c.read_labels_array("label")?;
    c.emit(Op::Match { targets });
    Ok(())
}

fn op_ec_add(c: &mut dyn OpContext) -> ParseResult<()> {
    c.min_version(9);
    let group = c.must_read_ec_group("curve")?;
    c.emit(Op::EcAdd { group });
    Ok(())
}

fn op_ec_scalar_mul(c: &mut dyn OpContext) -> ParseResult<()> {
    c.min_version(9);
    let group = c.must_read_ec_group("curve")?;
    c.emit(Op::EcScalarMul { group });
    Ok(())
}

fn op_ec_pairing_check(c: &mut dyn OpContext) -> ParseResult<()> {
    c.min_version(9);
    let group = c.must_read_ec_group("curve")?;
    c.emit(Op::EcPairingCheck { group });
    Ok(())
}

fn op_ec_multi_exp(c: &mut dyn OpContext) -> ParseResult<()> {
    c.min_version(9);
    let group = c.must_read_ec_group("curve")?;
    c.emit(Op::EcMultiExp { group });
    Ok(())
}

fn op_ec_subgroup_check(c: &mut dyn OpContext) -> ParseResult<()> {
    c.min_version(9);
    let group = c.must_read_ec_group("curve")?;
    c.emit(Op::EcSubgroupCheck { group });
    Ok(())
}

fn op_ec_map_to(c: &mut dyn OpContext) -> ParseResult<()> {
    c.min_version(9);
    let group = c.must_read_ec_group("curve")?;
    c.emit(Op::EcMapTo { group });
    Ok(())
}

fn op_itxn_field(c: &mut dyn OpContext) -> ParseResult<()> {
    c.mode_min_version(Mode::Sig, 0);
    c.mode_min_version(Mode::App, 5);
    let field = c.must_read_itxn_field("f")?;
    c.emit(Op::ItxnField { field });
    Ok(())
}

fn op_itxn(c: &mut dyn OpContext) -> ParseResult<()> {
    c.mode_min_version(Mode::Sig, 0);
    c.mode_min_version(Mode::App, 5);
    let field = c.must_read_txn_field("f")?;
    c.emit(Op::Itxn { field });
    Ok(())
}

fn op_itxna(c: &mut dyn OpContext) -> ParseResult<()> {
    c.mode_min_version(Mode::Sig, 0);
    c.mode_min_version(Mode::App, 5);
    let field = c.must_read_txna_field("f")?;
    let index = c.must_read_uint8("i")?;
    c.emit(Op::Itxna { field, index });
    Ok(())
}

fn op_gitxn(c: &mut dyn OpContext) -> ParseResult<()> {
    c.mode_min_version(Mode::Sig, 0);
    c.mode_min_version(Mode::App, 6);
    let group = c.must_read_uint8("t")?;
    let field = c.must_read_txn_field("f")?;
    c.emit(Op::Gitxn { group, field });
    Ok(())
}

fn op_gitxna(c: &mut dyn OpContext) -> ParseResult<()> {
    c.mode_min_version(Mode::Sig, 0);
    c.mode_min_version(Mode::App, 6);
    let group = c.must_read_uint8("t")?;
    let field = c.must_read_txna_field("f")?;
    let index = c.must_read_uint8("i")?;
    c.emit(Op::Gitxna {
        group,
        field,
        index,
    });
    Ok(())
}

fn op_txnas(c: &mut dyn OpContext) -> ParseResult<()> {
    c.min_version(5);
    let field = c.must_read_txna_field("f")?;
    c.emit(Op::Txnas { field });
    Ok(())
}

fn op_gtxnas(c: &mut dyn OpContext) -> ParseResult<()> {
    c.min_version(5);
    let group = c.must_read_uint8("t")?;
    let field = c.must_read_txna_field("f")?;
    c.emit(Op::Gtxnas { group, field });
    Ok(())
}

fn op_gtxnsas(c: &mut dyn OpContext) -> ParseResult<()> {
    c.min_version(5);
    let field = c.must_read_txna_field("f")?;
    c.emit(Op::Gtxnsas { field });
    Ok(())
}

fn op_itxnas(c: &mut dyn OpContext) -> ParseResult<()> {
    c.mode_min_version(Mode::Sig, 0);
    c.mode_min_version(Mode::App, 6);
    let field = c.must_read_txna_field("f")?;
    c.emit(Op::Itxnas { field });
    Ok(())
}

fn op_gitxnas(c: &mut dyn OpContext) -> ParseResult<()> {
    c.mode_min_version(Mode::Sig, 0);
    c.mode_min_version(Mode::App, 6);
    let group = c.must_read_uint8("t")?;
    let field = c.must_read_txna_field("f")?;
    c.emit(Op::Gitxnas { group, field });
    Ok(())
}

fn op_vrf_verify(c: &mut dyn OpContext) -> ParseResult<()> {
    c.min_version(7);
    let standard = c.must_read_vrf_standard("f")?;
    c.emit(Op::VrfVerify { standard });
    Ok(())
}

fn op_block(c: &mut dyn OpContext) -> ParseResult<()> {
    c.min_version(7);
    let field = c.must_read_block_field("f")?;
    c.emit(Op::Block { field });
    Ok(())
}

const OPS_LIST: &[(&str, ParseFn)] = &[
    ("replace", op_replace),
    ("byte", op_byte),
    ("int", op_int),
    ("method", op_method),
    ("addr", op_addr),
    ("err", op_err),
    ("sha256", op_sha256),
    ("keccak256", op_keccak256),
    ("sha512_256", op_sha512_256),
    ("ed25519verify", op_ed25519verify),
    ("ecdsa_verify", op_ecdsa_verify),
    ("ecdsa_pk_decompress", op_ecdsa_pk_decompress),
    ("ecdsa_pk_recover", op_ecdsa_pk_recover),
    ("+", op_plus),
    ("-", op_minus),
    ("/", op_div),
    ("*", op_mul),
    ("<", op_lt),
    (">", op_gt),
    ("<=", op_le),
    (">=", op_ge),
    ("&&", op_and),
    ("||", op_or),
    ("==", op_eq),
    ("!=", op_neq),
    ("!", op_not),
    ("len", op_len),
    ("itob", op_itob),
    ("btoi", op_btoi),
    ("%", op_modulo),
    ("|", op_bit_or),
    ("&", op_bit_and),
    ("^", op_bit_xor),
    ("~", op_bit_not),
    ("mulw", op_mulw),
    ("addw", op_addw),
    ("divmodw", op_divmodw),
    ("intcblock", op_intcblock),
    ("intc", op_intc),
    ("intc_0", op_intc_0),
    ("intc_1", op_intc_1),
    ("intc_2", op_intc_2),
    ("intc_3", op_intc_3),
    ("bytecblock", op_bytecblock),
    ("bytec", op_bytec),
    ("bytec_0", op_bytec_0),
    ("bytec_1", op_bytec_1),
    ("bytec_2", op_bytec_2),
    ("bytec_3", op_bytec_3),
    ("arg", op_arg),
    ("arg_0", op_arg_0),
    ("arg_1", op_arg_1),
    ("arg_2", op_arg_2),
    ("arg_3", op_arg_3),
    ("txn", op_txn),
    ("global", op_global),
    ("gtxn", op_gtxn),
    ("load", op_load),
    ("store", op_store),
    ("txna", op_txna),
    ("gtxna", op_gtxna),
    ("gtxns", op_gtxns),
    ("gtxnsa", op_gtxnsa),
    ("gload", op_gload),
    ("gloads", op_gloads),
    ("gaid", op_gaid),
    ("gaids", op_gaids),
    ("loads", op_loads),
    ("stores", op_stores),
    ("bnz", op_bnz),
    ("bz", op_bz),
    ("b", op_b),
    ("return", op_return),
    ("assert", op_assert),
    ("bury", op_bury),
    ("popn", op_popn),
    ("dupn", op_dupn),
    ("pop", op_pop),
    ("dup", op_dup),
    ("dup2", op_dup2),
    ("dig", op_dig),
    ("swap", op_swap),
    ("select", op_select),
    ("cover", op_cover),
    ("uncover", op_uncover),
    ("concat", op_concat),
    ("substring", op_substring),
    ("substring3", op_substring3),
    ("getbit", op_getbit),
    ("setbit", op_setbit),
    ("getbyte", op_getbyte),
    ("setbyte", op_setbyte),
    ("extract", op_extract),
    ("extract3", op_extract3),
    ("extract_uint16", op_extract_uint16),
    ("extract_uint32", op_extract_uint32),
    ("extract_uint64", op_extract_uint64),
    ("replace2", op_replace2),
    ("replace3", op_replace3),
    ("base64_decode", op_base64_decode),
    ("json_ref", op_json_ref),
    ("balance", op_balance),
    ("app_opted_in", op_app_opted_in),
    ("app_local_get", op_app_local_get),
    ("app_local_get_ex", op_app_local_get_ex),
    ("app_global_get", op_app_global_get),
    ("app_global_get_ex", op_app_global_get_ex),
    ("app_local_put", op_app_local_put),
    ("app_global_put", op_app_global_put),
    ("app_local_del", op_app_local_del),
    ("app_global_del", op_app_global_del),
    ("asset_holding_get", op_asset_holding_get),
    ("asset_params_get", op_asset_params_get),
    ("app_params_get", op_app_params_get),
    ("acct_params_get", op_acct_params_get),
    ("min_balance", op_min_balance),
    ("pushbytes", op_pushbytes),
    ("pushint", op_pushint),
    ("pushbytess", op_pushbytess),
    ("pushints", op_pushints),
    ("ed25519verify_bare", op_ed25519verify_bare),
    ("callsub", op_callsub),
    ("retsub", op_retsub),
    ("proto", op_proto),
    ("frame_dig", op_frame_dig),
    ("frame_bury", op_frame_bury),
    ("switch", op_switch),
    ("match", op_match),
    ("shl", op_shl),
    ("shr", op_shr),
    ("sqrt", op_sqrt),
    ("bitlen", op_bitlen),
    ("exp", op_exp),
    ("expw", op_expw),
    ("bsqrt", op_bsqrt),
    ("divw", op_divw),
    ("sha3_256", op_sha3_256),
    ("ec_add", op_ec_add),
    ("ec_scalar_mul", op_ec_scalar_mul),
    ("ec_pairing_check", op_ec_pairing_check),
    ("ec_multi_exp", op_ec_multi_exp),
    ("ec_subgroup_check", op_ec_subgroup_check),
    ("ec_map_to", op_ec_map_to),
    ("b+", op_bytes_plus),
    ("b-", op_bytes_minus),
    ("b/", op_bytes_div),
    ("b*", op_bytes_mul),
    ("b<", op_bytes_lt),
    ("b>", op_bytes_gt),
    ("b<=", op_bytes_le),
    ("b>=", op_bytes_ge),
    ("b==", op_bytes_eq),
    ("b!=", op_bytes_neq),
    ("b%", op_bytes_modulo),
    ("b|", op_bytes_bit_or),
    ("b&", op_bytes_bit_and),
    ("b^", op_bytes_bit_xor),
    ("b~", op_bytes_bit_not),
    ("bzero", op_bzero),
    ("log", op_log),
    ("itxn_begin", op_itxn_begin),
    ("itxn_field", op_itxn_field),
    ("itxn_submit", op_itxn_submit),
    ("itxn", op_itxn),
    ("itxna", op_itxna),
    ("itxn_next", op_itxn_next),
    ("gitxn", op_gitxn),
    ("gitxna", op_gitxna),
    ("box_create", op_box_create),
    ("box_extract", op_box_extract),
    ("box_replace", op_box_replace),
    ("box_del", op_box_del),
    ("box_len", op_box_len),
    ("box_get", op_box_get),
    ("box_put", op_box_put),
    ("txnas", op_txnas),
    ("gtxnas", op_gtxnas),
    ("gtxnsas", op_gtxnsas),
    ("args", op_args),
    ("gloadss", op_gloadss),
    ("itxnas", op_itxnas),
    ("gitxnas", op_gitxnas),
    ("vrf_verify", op_vrf_verify),
    ("block", op_block),
];

pub struct OpTable {
    items: IndexMap<&'static str, OpSpec>,
}

impl OpTable {
    pub fn get(&self, name: &str) -> Option<&OpSpec> {
        self.items.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &OpSpec> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The process-wide opcode catalog, built once by replaying every parse
/// function against the schema recorder. Read-only after construction.
pub static OPS: LazyLock<OpTable> = LazyLock::new(|| {
    let mut items = IndexMap::new();
    for &(name, parse) in OPS_LIST {
        let mut schema = SchemaContext::new();
        // The schema recorder never aborts.
        let _ = parse(&mut schema);

        let doc = docs::op_doc(name);
        let extra = docs::op_doc_extra(name);
        let full_doc = match (doc.is_empty(), extra.is_empty()) {
            (_, true) => doc.to_string(),
            (true, false) => extra.to_string(),
            (false, false) => format!("{doc}\n{extra}"),
        };

        items.insert(
            name,
            OpSpec {
                name,
                sig_version: schema.sig_version,
                app_version: schema.app_version,
                args_sig: render_args_sig(&schema.args),
                full_sig: render_full_sig(name, &schema.args),
                args: schema.args,
                parse,
                doc,
                full_doc,
            },
        );
    }
    OpTable { items }
});

pub fn ops() -> &'static OpTable {
    &OPS
}

fn render_args_sig(args: &[ArgSpec]) -> String {
    let mut names = Vec::new();
    let mut opened = false;
    for arg in args {
        let mut name = arg.name.to_string();
        if arg.array {
            name.push_str(", ...");
        }
        if arg.optional && !opened {
            opened = true;
            name.insert(0, '[');
        }
        names.push(name);
    }
    if opened {
        if let Some(last) = names.last_mut() {
            last.push(']');
        }
    }
    names.join(" ")
}

fn render_full_sig(name: &str, args: &[ArgSpec]) -> String {
    let mut parts = Vec::new();
    let mut opened = false;
    for arg in args {
        let mut part = format!("{} : {}", arg.ty.describe(), arg.name);
        if arg.array {
            part.push_str(", ...");
        }
        part = format!("{{{part}}}");
        if arg.optional && !opened {
            opened = true;
            part.insert(0, '[');
        }
        parts.push(part);
    }
    if opened {
        if let Some(last) = parts.last_mut() {
            last.push(']');
        }
    }
    if parts.is_empty() {
        name.to_string()
    } else {
        format!("{} {}", name, parts.join(" "))
    }
}

/// Looks up the field spec named by `text` (symbolic or numeric) for a
/// field-enum argument type. Version gates are not applied here; this
/// feeds hover documentation, which should resolve regardless.
pub fn field_info(ty: ArgType, text: &str) -> Option<&'static FieldSpec> {
    fn find<F: FieldEnum>(text: &str) -> Option<&'static FieldSpec> {
        if let Some(field) = F::by_name(text) {
            return Some(field.spec());
        }
        let value = parse_uint64(text).ok()?;
        F::by_value(value).map(|field| field.spec())
    }

    match ty {
        ArgType::TxnField | ArgType::TxnaField | ArgType::ItxnField => find::<TxnField>(text),
        ArgType::GlobalField => find::<GlobalField>(text),
        ArgType::AssetHoldingField => find::<AssetHoldingField>(text),
        ArgType::AssetParamsField => find::<AssetParamsField>(text),
        ArgType::AppParamsField => find::<AppParamsField>(text),
        ArgType::AcctParamsField => find::<AcctParamsField>(text),
        ArgType::JsonRef => find::<JsonRef>(text),
        ArgType::EcdsaCurve => find::<EcdsaCurve>(text),
        ArgType::VrfStandard => find::<VrfStandard>(text),
        ArgType::Base64Encoding => find::<Base64Encoding>(text),
        ArgType::BlockField => find::<BlockField>(text),
        ArgType::EcGroupField => find::<EcGroup>(text),
        _ => None,
    }
}

/// The symbolic name for a numeric field value, used for inlay hints.
pub fn field_name(ty: ArgType, value: u64) -> Option<&'static str> {
    fn find<F: FieldEnum>(value: u64) -> Option<&'static str> {
        F::by_value(value).map(|field| field.name())
    }

    match ty {
        ArgType::TxnField | ArgType::TxnaField | ArgType::ItxnField => find::<TxnField>(value),
        ArgType::GlobalField => find::<GlobalField>(value),
        ArgType::AssetHoldingField => find::<AssetHoldingField>(value),
        ArgType::AssetParamsField => find::<AssetParamsField>(value),
        ArgType::AppParamsField => find::<AppParamsField>(value),
        ArgType::AcctParamsField => find::<AcctParamsField>(value),
        ArgType::JsonRef => find::<JsonRef>(value),
        ArgType::EcdsaCurve => find::<EcdsaCurve>(value),
        ArgType::VrfStandard => find::<VrfStandard>(value),
        ArgType::Base64Encoding => find::<Base64Encoding>(value),
        ArgType::BlockField => find::<BlockField>(value),
        ArgType::EcGroupField => find::<EcGroup>(value),
        _ => None,
    }
}

/// The catalog values for a field-enum argument: `(spec, effective
/// version)`. The inner-transaction view uses each entry's itxn version
/// and the array view keeps only array fields.
pub fn field_values(ty: ArgType) -> Vec<(&'static FieldSpec, u64)> {
    fn all<F: FieldEnum>() -> Vec<(&'static FieldSpec, u64)> {
        F::ALL
            .iter()
            .map(|field| (field.spec(), field.spec().version))
            .collect()
    }

    match ty {
        ArgType::TxnField => all::<TxnField>(),
        ArgType::TxnaField => TxnField::ALL
            .iter()
            .map(|field| field.spec())
            .filter(|spec| spec.array)
            .map(|spec| (spec, spec.version))
            .collect(),
        ArgType::ItxnField => TxnField::ALL
            .iter()
            .map(|field| field.spec())
            .filter(|spec| spec.itx_version > 0)
            .map(|spec| (spec, spec.itx_version))
            .collect(),
        ArgType::GlobalField => all::<GlobalField>(),
        ArgType::AssetHoldingField => all::<AssetHoldingField>(),
        ArgType::AssetParamsField => all::<AssetParamsField>(),
        ArgType::AppParamsField => all::<AppParamsField>(),
        ArgType::AcctParamsField => all::<AcctParamsField>(),
        ArgType::JsonRef => all::<JsonRef>(),
        ArgType::EcdsaCurve => all::<EcdsaCurve>(),
        ArgType::VrfStandard => all::<VrfStandard>(),
        ArgType::Base64Encoding => all::<Base64Encoding>(),
        ArgType::BlockField => all::<BlockField>(),
        ArgType::EcGroupField => all::<EcGroup>(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_contains_every_listed_opcode() {
        assert_eq!(OPS.len(), OPS_LIST.len());
        for &(name, _) in OPS_LIST {
            assert!(OPS.get(name).is_some(), "missing {name}");
        }
    }

    #[test]
    fn every_opcode_is_documented() {
        for spec in OPS.iter() {
            assert!(!spec.doc.is_empty(), "no doc for {}", spec.name);
            assert!(!spec.full_doc.is_empty(), "no full doc for {}", spec.name);
        }
    }

    #[test]
    fn txn_schema_has_optional_index() {
        let spec = OPS.get("txn").unwrap();
        assert_eq!(spec.args.len(), 2);
        assert_eq!(spec.args[0].ty, ArgType::TxnField);
        assert!(!spec.args[0].optional);
        assert_eq!(spec.args[1].ty, ArgType::Uint8);
        assert!(spec.args[1].optional);
        assert_eq!(spec.args_sig, "f [i]");
    }

    #[test]
    fn extract_arguments_after_an_optional_are_optional() {
        let spec = OPS.get("extract").unwrap();
        assert_eq!(spec.args.len(), 2);
        assert!(spec.args[0].optional);
        assert!(spec.args[1].optional);
        assert_eq!(spec.args_sig, "[s l]");
    }

    #[test]
    fn switch_takes_a_label_array() {
        let spec = OPS.get("switch").unwrap();
        assert_eq!(spec.args.len(), 1);
        assert_eq!(spec.args[0].ty, ArgType::Label);
        assert!(spec.args[0].array);
        assert_eq!(spec.args_sig, "label, ...");
    }

    #[test]
    fn mode_minimum_versions() {
        let branch = OPS.get("b").unwrap();
        assert_eq!(branch.min_version(Mode::App), 2);
        assert_eq!(branch.min_version(Mode::Sig), 2);

        let arg = OPS.get("arg").unwrap();
        assert_eq!(arg.min_version(Mode::Sig), 1);
        assert_eq!(arg.min_version(Mode::App), 0);

        let gload = OPS.get("gload").unwrap();
        assert_eq!(gload.min_version(Mode::App), 4);
        assert_eq!(gload.min_version(Mode::Sig), 0);

        let ed = OPS.get("ed25519verify").unwrap();
        assert_eq!(ed.min_version(Mode::Sig), 1);
        assert_eq!(ed.min_version(Mode::App), 5);
    }

    #[test]
    fn full_signature_renders_types_and_names() {
        let spec = OPS.get("gtxna").unwrap();
        assert_eq!(
            spec.full_sig,
            "gtxna {uint8 : t} {transaction array field index : f} {uint8 : i}"
        );
    }

    #[test]
    fn field_values_respect_family_filters() {
        assert!(
            field_values(ArgType::TxnaField)
                .iter()
                .all(|(spec, _)| spec.array)
        );
        assert!(
            field_values(ArgType::ItxnField)
                .iter()
                .all(|(spec, version)| spec.itx_version > 0 && *version == spec.itx_version)
        );
        assert!(field_values(ArgType::Uint8).is_empty());
    }

    #[test]
    fn field_info_resolves_both_spellings() {
        let by_name = field_info(ArgType::TxnField, "Fee").unwrap();
        let by_value = field_info(ArgType::TxnField, "1").unwrap();
        assert_eq!(by_name.name, by_value.name);
        assert!(field_info(ArgType::TxnField, "NotAField").is_none());
    }
}
