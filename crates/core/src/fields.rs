use thiserror::Error;

/// Catalog row shared by every field family: the wire value, the symbolic
/// name, the language version that introduced it, whether it is an
/// array-typed transaction field, the version it became readable from
/// inner transactions (0 = never), and a documentation note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub value: u64,
    pub version: u64,
    pub array: bool,
    pub itx_version: u64,
    pub note: &'static str,
}

/// A named set of integer constants forming the argument domain of a
/// family of opcodes. Lookup is bi-directional: by symbolic name and by
/// numeric value.
pub trait FieldEnum: Copy + 'static {
    const FAMILY: &'static str;
    const ALL: &'static [Self];

    fn spec(self) -> &'static FieldSpec;

    fn name(self) -> &'static str {
        self.spec().name
    }

    fn value(self) -> u64 {
        self.spec().value
    }

    fn by_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.spec().name == name)
    }

    fn by_value(value: u64) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.spec().value == value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("unknown {family} field: {name}")]
    Unknown { family: &'static str, name: String },
    #[error("{family} field {name} requires version >= {min} (current: {current})")]
    VersionTooOld {
        family: &'static str,
        name: String,
        min: u64,
        current: u64,
    },
    #[error("{name} is not an array field")]
    NotArray { name: String },
    #[error("{name} cannot be read from an inner transaction")]
    NotItxn { name: String },
}

macro_rules! field_family {
    (
        $(#[$doc:meta])*
        $Enum:ident, family $family:literal {
            $( $Variant:ident = $value:literal, min $version:literal, array $array:literal, itx $itx:literal, $note:literal; )+
        }
    ) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $Enum {
            $( $Variant, )+
        }

        impl FieldEnum for $Enum {
            const FAMILY: &'static str = $family;
            const ALL: &'static [Self] = &[ $( Self::$Variant, )+ ];

            fn spec(self) -> &'static FieldSpec {
                match self {
                    $( Self::$Variant => &FieldSpec {
                        name: stringify!($Variant),
                        value: $value,
                        version: $version,
                        array: $array,
                        itx_version: $itx,
                        note: $note,
                    }, )+
                }
            }
        }
    };
}

field_family! {
    /// Fields of a transaction, readable through the `txn` opcode family.
    TxnField, family "transaction" {
        Sender = 0, min 1, array false, itx 5, "32 byte address";
        Fee = 1, min 1, array false, itx 5, "microalgos";
        FirstValid = 2, min 1, array false, itx 0, "round number";
        FirstValidTime = 3, min 1, array false, itx 0, "UNIX timestamp of block before the first valid round";
        LastValid = 4, min 1, array false, itx 0, "round number";
        Note = 5, min 1, array false, itx 5, "any data up to 1024 bytes";
        Lease = 6, min 1, array false, itx 0, "32 byte lease value";
        Receiver = 7, min 1, array false, itx 5, "32 byte address";
        Amount = 8, min 1, array false, itx 5, "microalgos";
        CloseRemainderTo = 9, min 1, array false, itx 5, "32 byte address";
        VotePK = 10, min 1, array false, itx 6, "32 byte address";
        SelectionPK = 11, min 1, array false, itx 6, "32 byte address";
        VoteFirst = 12, min 1, array false, itx 6, "first round the participation key is valid";
        VoteLast = 13, min 1, array false, itx 6, "last round the participation key is valid";
        VoteKeyDilution = 14, min 1, array false, itx 6, "dilution for the 2-level participation key";
        Type = 15, min 1, array false, itx 5, "transaction type as bytes";
        TypeEnum = 16, min 1, array false, itx 5, "transaction type as integer";
        XferAsset = 17, min 1, array false, itx 5, "asset ID";
        AssetAmount = 18, min 1, array false, itx 5, "value in asset base units";
        AssetSender = 19, min 1, array false, itx 5, "32 byte address, source of a clawback";
        AssetReceiver = 20, min 1, array false, itx 5, "32 byte address";
        AssetCloseTo = 21, min 1, array false, itx 5, "32 byte address";
        GroupIndex = 22, min 1, array false, itx 0, "position of this transaction within the group";
        TxID = 23, min 1, array false, itx 0, "the computed ID for this transaction, 32 bytes";
        ApplicationID = 24, min 2, array false, itx 6, "application ID from the ApplicationCall";
        OnCompletion = 25, min 2, array false, itx 6, "ApplicationCall on-completion action";
        ApplicationArgs = 26, min 2, array true, itx 6, "arguments passed to the application";
        NumAppArgs = 27, min 2, array false, itx 0, "number of ApplicationArgs";
        Accounts = 28, min 2, array true, itx 6, "accounts listed in the ApplicationCall";
        NumAccounts = 29, min 2, array false, itx 0, "number of Accounts";
        ApprovalProgram = 30, min 2, array false, itx 6, "approval program bytes";
        ClearStateProgram = 31, min 2, array false, itx 6, "clear state program bytes";
        RekeyTo = 32, min 2, array false, itx 6, "32 byte address, future authorizer of the sender";
        ConfigAsset = 33, min 2, array false, itx 5, "asset ID in asset config transaction";
        ConfigAssetTotal = 34, min 2, array false, itx 5, "total number of units of this asset";
        ConfigAssetDecimals = 35, min 2, array false, itx 5, "number of digits to display after the decimal place";
        ConfigAssetDefaultFrozen = 36, min 2, array false, itx 5, "whether the asset's slots are frozen by default";
        ConfigAssetUnitName = 37, min 2, array false, itx 5, "unit name of the asset";
        ConfigAssetName = 38, min 2, array false, itx 5, "the asset name";
        ConfigAssetURL = 39, min 2, array false, itx 5, "URL with further asset information";
        ConfigAssetMetadataHash = 40, min 2, array false, itx 5, "32 byte commitment to asset metadata";
        ConfigAssetManager = 41, min 2, array false, itx 5, "32 byte address";
        ConfigAssetReserve = 42, min 2, array false, itx 5, "32 byte address";
        ConfigAssetFreeze = 43, min 2, array false, itx 5, "32 byte address";
        ConfigAssetClawback = 44, min 2, array false, itx 5, "32 byte address";
        FreezeAsset = 45, min 2, array false, itx 5, "asset ID being frozen or un-frozen";
        FreezeAssetAccount = 46, min 2, array false, itx 5, "32 byte address whose asset slot is changed";
        FreezeAssetFrozen = 47, min 2, array false, itx 5, "the new frozen value, 0 or 1";
        Assets = 48, min 3, array true, itx 6, "foreign assets listed in the ApplicationCall";
        NumAssets = 49, min 3, array false, itx 0, "number of Assets";
        Applications = 50, min 3, array true, itx 6, "foreign apps listed in the ApplicationCall";
        NumApplications = 51, min 3, array false, itx 0, "number of Applications";
        GlobalNumUint = 52, min 3, array false, itx 6, "number of global state integers in the ApplicationCall";
        GlobalNumByteSlice = 53, min 3, array false, itx 6, "number of global state byteslices in the ApplicationCall";
        LocalNumUint = 54, min 3, array false, itx 6, "number of local state integers in the ApplicationCall";
        LocalNumByteSlice = 55, min 3, array false, itx 6, "number of local state byteslices in the ApplicationCall";
        ExtraProgramPages = 56, min 4, array false, itx 6, "number of additional pages for each of the application's programs";
        Nonparticipation = 57, min 5, array false, itx 6, "marks an account nonparticipating for rewards";
        Logs = 58, min 5, array true, itx 5, "log messages emitted by an application call";
        NumLogs = 59, min 5, array false, itx 5, "number of Logs";
        CreatedAssetID = 60, min 5, array false, itx 5, "asset ID allocated by the creation of an ASA";
        CreatedApplicationID = 61, min 5, array false, itx 5, "application ID allocated by the creation of an application";
        LastLog = 62, min 6, array false, itx 6, "the last message emitted, empty bytes if none were emitted";
        StateProofPK = 63, min 6, array false, itx 6, "64 byte state proof public key";
        ApprovalProgramPages = 64, min 7, array true, itx 7, "approval program as an array of pages";
        NumApprovalProgramPages = 65, min 7, array false, itx 7, "number of ApprovalProgramPages";
        ClearStateProgramPages = 66, min 7, array true, itx 7, "clear state program as an array of pages";
        NumClearStateProgramPages = 67, min 7, array false, itx 7, "number of ClearStateProgramPages";
    }
}

field_family! {
    /// Globals readable through the `global` opcode.
    GlobalField, family "global" {
        MinTxnFee = 0, min 1, array false, itx 0, "microalgos";
        MinBalance = 1, min 1, array false, itx 0, "microalgos";
        MaxTxnLife = 2, min 1, array false, itx 0, "rounds";
        ZeroAddress = 3, min 1, array false, itx 0, "32 byte address of all zero bytes";
        GroupSize = 4, min 1, array false, itx 0, "number of transactions in this atomic group";
        LogicSigVersion = 5, min 2, array false, itx 0, "maximum supported version";
        Round = 6, min 2, array false, itx 0, "current round number";
        LatestTimestamp = 7, min 2, array false, itx 0, "last confirmed block UNIX timestamp, fails if negative";
        CurrentApplicationID = 8, min 2, array false, itx 0, "ID of the current application executing";
        CreatorAddress = 9, min 3, array false, itx 0, "address of the creator of the current application";
        CurrentApplicationAddress = 10, min 5, array false, itx 0, "address that the current application controls";
        GroupID = 11, min 5, array false, itx 0, "ID of the transaction group, 32 zero bytes if not part of a group";
        OpcodeBudget = 12, min 6, array false, itx 0, "remaining execution budget";
        CallerApplicationID = 13, min 6, array false, itx 0, "ID of the caller application, 0 if this is a top-level call";
        CallerApplicationAddress = 14, min 6, array false, itx 0, "address of the caller application, zero address for top-level calls";
    }
}

field_family! {
    AssetHoldingField, family "asset holding" {
        AssetBalance = 0, min 2, array false, itx 0, "amount of the asset held by this account";
        AssetFrozen = 1, min 2, array false, itx 0, "is the asset frozen for this account, 0 or 1";
    }
}

field_family! {
    AssetParamsField, family "asset params" {
        AssetTotal = 0, min 2, array false, itx 0, "total number of units of this asset";
        AssetDecimals = 1, min 2, array false, itx 0, "number of digits to display after the decimal place";
        AssetDefaultFrozen = 2, min 2, array false, itx 0, "frozen by default, 0 or 1";
        AssetUnitName = 3, min 2, array false, itx 0, "asset unit name";
        AssetName = 4, min 2, array false, itx 0, "asset name";
        AssetURL = 5, min 2, array false, itx 0, "URL with further asset information";
        AssetMetadataHash = 6, min 2, array false, itx 0, "arbitrary commitment";
        AssetManager = 7, min 2, array false, itx 0, "manager address";
        AssetReserve = 8, min 2, array false, itx 0, "reserve address";
        AssetFreeze = 9, min 2, array false, itx 0, "freeze address";
        AssetClawback = 10, min 2, array false, itx 0, "clawback address";
        AssetCreator = 11, min 5, array false, itx 0, "creator address";
    }
}

field_family! {
    AppParamsField, family "app params" {
        AppApprovalProgram = 0, min 5, array false, itx 0, "approval program bytes";
        AppClearStateProgram = 1, min 5, array false, itx 0, "clear state program bytes";
        AppGlobalNumUint = 2, min 5, array false, itx 0, "number of global state integers";
        AppGlobalNumByteSlice = 3, min 5, array false, itx 0, "number of global state byteslices";
        AppLocalNumUint = 4, min 5, array false, itx 0, "number of local state integers";
        AppLocalNumByteSlice = 5, min 5, array false, itx 0, "number of local state byteslices";
        AppExtraProgramPages = 6, min 5, array false, itx 0, "number of extra program pages";
        AppCreator = 7, min 5, array false, itx 0, "creator address";
        AppAddress = 8, min 5, array false, itx 0, "address for which this application has authority";
    }
}

field_family! {
    AcctParamsField, family "account params" {
        AcctBalance = 0, min 6, array false, itx 0, "account balance in microalgos";
        AcctMinBalance = 1, min 6, array false, itx 0, "minimum required balance in microalgos";
        AcctAuthAddr = 2, min 6, array false, itx 0, "address the account is rekeyed to";
        AcctTotalNumUint = 3, min 8, array false, itx 0, "total number of uint64 values allocated in global and local states";
        AcctTotalNumByteSlice = 4, min 8, array false, itx 0, "total number of byte array values allocated in global and local states";
        AcctTotalExtraAppPages = 5, min 8, array false, itx 0, "number of extra app program pages used";
        AcctTotalAppsCreated = 6, min 8, array false, itx 0, "number of existing apps created by this account";
        AcctTotalAppsOptedIn = 7, min 8, array false, itx 0, "number of apps this account is opted into";
        AcctTotalAssetsCreated = 8, min 8, array false, itx 0, "number of existing ASAs created by this account";
        AcctTotalAssets = 9, min 8, array false, itx 0, "number of ASAs held by this account";
        AcctTotalBoxes = 10, min 8, array false, itx 0, "number of existing boxes created by this account's app";
        AcctTotalBoxBytes = 11, min 8, array false, itx 0, "total bytes used by this account's app's box keys and values";
    }
}

field_family! {
    JsonRef, family "JSON reference" {
        JSONString = 0, min 7, array false, itx 0, "utf-8 encoded string";
        JSONUint64 = 1, min 7, array false, itx 0, "decimal uint64";
        JSONObject = 2, min 7, array false, itx 0, "JSON object";
    }
}

field_family! {
    EcdsaCurve, family "ECDSA curve" {
        Secp256k1 = 0, min 5, array false, itx 0, "secp256k1 curve, used in Bitcoin";
        Secp256r1 = 1, min 7, array false, itx 0, "secp256r1 curve, NIST standard";
    }
}

field_family! {
    VrfStandard, family "VRF standard" {
        VrfAlgorand = 0, min 7, array false, itx 0, "VRF used in Algorand, ECVRF-ED25519-SHA512-Elligator2";
    }
}

field_family! {
    Base64Encoding, family "base64 encoding" {
        URLEncoding = 0, min 7, array false, itx 0, "base64 URL and filename safe alphabet";
        StdEncoding = 1, min 7, array false, itx 0, "standard base64 alphabet";
    }
}

field_family! {
    BlockField, family "block" {
        BlkSeed = 0, min 7, array false, itx 0, "seed of the block, 32 bytes";
        BlkTimestamp = 1, min 7, array false, itx 0, "UNIX timestamp of the block";
    }
}

field_family! {
    EcGroup, family "EC group" {
        BN254g1 = 0, min 9, array false, itx 0, "G1 of the BN254 curve, points as 64 byte concatenated X and Y";
        BN254g2 = 1, min 9, array false, itx 0, "G2 of the BN254 curve, points as 128 byte concatenated X and Y";
        BLS12_381g1 = 2, min 9, array false, itx 0, "G1 of the BLS 12-381 curve, points as 96 byte concatenated X and Y";
        BLS12_381g2 = 3, min 9, array false, itx 0, "G2 of the BLS 12-381 curve, points as 192 byte concatenated X and Y";
    }
}

/// Named `uint64` constants accepted wherever a constant integer argument
/// is expected: transaction types and on-completion actions.
pub const TXN_TYPES: &[(&str, u64)] = &[
    ("unknown", 0),
    ("pay", 1),
    ("keyreg", 2),
    ("acfg", 3),
    ("axfer", 4),
    ("afrz", 5),
    ("appl", 6),
];

pub const ON_COMPLETIONS: &[(&str, u64)] = &[
    ("NoOp", 0),
    ("OptIn", 1),
    ("CloseOut", 2),
    ("ClearState", 3),
    ("UpdateApplication", 4),
    ("DeleteApplication", 5),
];

pub fn named_constant(text: &str) -> Option<u64> {
    TXN_TYPES
        .iter()
        .chain(ON_COMPLETIONS)
        .find(|(name, _)| *name == text)
        .map(|&(_, value)| value)
}

/// Context in which a transaction-field argument is being read; each
/// context admits a different subset of [`TxnField`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxnFieldContext {
    Txn,
    Txna,
    Itxn,
}

/// Reads a field given as either its symbolic name or its numeric value.
/// The boolean result is true for the symbolic spelling. Version gates
/// apply to both spellings; they are independent of the opcode's own gate.
pub fn read_field<F: FieldEnum>(version: u64, text: &str) -> Result<(F, bool), FieldError> {
    if let Some(field) = F::by_name(text) {
        check_version(field.spec().version, version, F::FAMILY, text)?;
        return Ok((field, true));
    }

    let unknown = || FieldError::Unknown {
        family: F::FAMILY,
        name: text.to_string(),
    };
    let value = parse_uint64(text).map_err(|_| unknown())?;
    let field = F::by_value(value).ok_or_else(unknown)?;
    check_version(field.spec().version, version, F::FAMILY, field.name())?;
    Ok((field, false))
}

pub fn read_txn_field(
    context: TxnFieldContext,
    version: u64,
    text: &str,
) -> Result<(TxnField, bool), FieldError> {
    let (field, is_const) = read_field::<TxnField>(version, text)?;
    let spec = field.spec();
    match context {
        TxnFieldContext::Txn => {}
        TxnFieldContext::Txna => {
            if !spec.array {
                return Err(FieldError::NotArray {
                    name: spec.name.to_string(),
                });
            }
        }
        TxnFieldContext::Itxn => {
            if spec.itx_version == 0 {
                return Err(FieldError::NotItxn {
                    name: spec.name.to_string(),
                });
            }
            check_version(spec.itx_version, version, TxnField::FAMILY, spec.name)?;
        }
    }
    Ok((field, is_const))
}

fn check_version(
    min: u64,
    current: u64,
    family: &'static str,
    name: &str,
) -> Result<(), FieldError> {
    if min > current {
        return Err(FieldError::VersionTooOld {
            family,
            name: name.to_string(),
            min,
            current,
        });
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntParseError;

/// Unsigned integer literal: decimal, `0x` hex, `0o` octal or `0b` binary.
pub fn parse_uint64(text: &str) -> Result<u64, IntParseError> {
    let parsed = if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16)
    } else if let Some(oct) = text.strip_prefix("0o").or_else(|| text.strip_prefix("0O")) {
        u64::from_str_radix(oct, 8)
    } else if let Some(bin) = text.strip_prefix("0b").or_else(|| text.strip_prefix("0B")) {
        u64::from_str_radix(bin, 2)
    } else {
        text.parse()
    };
    parsed.map_err(|_| IntParseError)
}

pub fn parse_uint8(text: &str) -> Result<u8, IntParseError> {
    let value = parse_uint64(text)?;
    u8::try_from(value).map_err(|_| IntParseError)
}

pub fn parse_int8(text: &str) -> Result<i8, IntParseError> {
    text.parse().map_err(|_| IntParseError)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_bidirectional() {
        assert_eq!(TxnField::by_name("Sender"), Some(TxnField::Sender));
        assert_eq!(TxnField::by_value(25), Some(TxnField::OnCompletion));
        assert_eq!(TxnField::OnCompletion.name(), "OnCompletion");
        assert_eq!(GlobalField::by_name("GroupSize"), Some(GlobalField::GroupSize));
        assert!(TxnField::by_name("NotAField").is_none());
        assert!(GlobalField::by_value(999).is_none());
    }

    #[test]
    fn values_match_declaration_order() {
        for (index, field) in TxnField::ALL.iter().enumerate() {
            assert_eq!(field.value(), index as u64, "{}", field.name());
        }
        for (index, field) in GlobalField::ALL.iter().enumerate() {
            assert_eq!(field.value(), index as u64, "{}", field.name());
        }
    }

    #[test]
    fn version_gate_applies_to_both_spellings() {
        let err = read_field::<TxnField>(1, "ApplicationID").unwrap_err();
        assert!(matches!(err, FieldError::VersionTooOld { min: 2, .. }));
        let err = read_field::<TxnField>(1, "24").unwrap_err();
        assert!(matches!(err, FieldError::VersionTooOld { min: 2, .. }));
        assert!(read_field::<TxnField>(2, "ApplicationID").is_ok());
    }

    #[test]
    fn symbolic_and_numeric_spellings_are_distinguished() {
        let (field, is_const) = read_field::<GlobalField>(2, "Round").unwrap();
        assert_eq!(field, GlobalField::Round);
        assert!(is_const);
        let (field, is_const) = read_field::<GlobalField>(2, "6").unwrap();
        assert_eq!(field, GlobalField::Round);
        assert!(!is_const);
    }

    #[test]
    fn txna_context_requires_array_fields() {
        let err = read_txn_field(TxnFieldContext::Txna, 5, "Sender").unwrap_err();
        assert!(matches!(err, FieldError::NotArray { .. }));
        assert!(read_txn_field(TxnFieldContext::Txna, 5, "ApplicationArgs").is_ok());
    }

    #[test]
    fn itxn_context_uses_inner_transaction_versions() {
        let err = read_txn_field(TxnFieldContext::Itxn, 5, "FirstValid").unwrap_err();
        assert!(matches!(err, FieldError::NotItxn { .. }));
        let err = read_txn_field(TxnFieldContext::Itxn, 5, "VotePK").unwrap_err();
        assert!(matches!(err, FieldError::VersionTooOld { min: 6, .. }));
        assert!(read_txn_field(TxnFieldContext::Itxn, 6, "VotePK").is_ok());
    }

    #[test]
    fn named_constants_cover_types_and_on_completions() {
        assert_eq!(named_constant("pay"), Some(1));
        assert_eq!(named_constant("appl"), Some(6));
        assert_eq!(named_constant("NoOp"), Some(0));
        assert_eq!(named_constant("DeleteApplication"), Some(5));
        assert_eq!(named_constant("whatever"), None);
    }

    #[test]
    fn integer_literals_accept_go_style_bases() {
        assert_eq!(parse_uint64("42"), Ok(42));
        assert_eq!(parse_uint64("0x2A"), Ok(42));
        assert_eq!(parse_uint64("0o52"), Ok(42));
        assert_eq!(parse_uint64("0b101010"), Ok(42));
        assert!(parse_uint64("4x2").is_err());
        assert!(parse_uint8("256").is_err());
        assert_eq!(parse_int8("-3"), Ok(-3));
    }
}
