//! Per-opcode documentation, keyed by the assembly spelling.

pub(crate) fn op_doc(name: &str) -> &'static str {
    match name {
        "int" => "pushes the named or literal uint64 constant",
        "byte" => "pushes the byte constant",
        "addr" => "pushes the 32 byte public key component of the address",
        "method" => "pushes the first four bytes of the SHA-512/256 hash of the method signature",
        "err" => "Fail immediately.",
        "sha256" => "SHA256 hash of value A, yields [32]byte",
        "keccak256" => "Keccak256 hash of value A, yields [32]byte",
        "sha512_256" => "SHA512_256 hash of value A, yields [32]byte",
        "sha3_256" => "SHA3_256 hash of value A, yields [32]byte",
        "ed25519verify" => {
            "for (data A, signature B, pubkey C) verify the signature of (\"ProgData\" || program_hash || data) against the pubkey => {0 or 1}"
        }
        "ed25519verify_bare" => {
            "for (data A, signature B, pubkey C) verify the signature of the data against the pubkey => {0 or 1}"
        }
        "ecdsa_verify" => {
            "for (data A, signature B, C and pubkey D, E) verify the signature of the data against the pubkey => {0 or 1}"
        }
        "ecdsa_pk_decompress" => "decompress pubkey A into components X, Y",
        "ecdsa_pk_recover" => "for (data A, recovery id B, signature C, D) recover a public key",
        "+" => "A plus B. Fail on overflow.",
        "-" => "A minus B. Fail if B > A.",
        "/" => "A divided by B (truncated division). Fail if B == 0.",
        "*" => "A times B. Fail on overflow.",
        "<" => "A less than B => {0 or 1}",
        ">" => "A greater than B => {0 or 1}",
        "<=" => "A less than or equal to B => {0 or 1}",
        ">=" => "A greater than or equal to B => {0 or 1}",
        "&&" => "A is not zero and B is not zero => {0 or 1}",
        "||" => "A is not zero or B is not zero => {0 or 1}",
        "==" => "A is equal to B => {0 or 1}",
        "!=" => "A is not equal to B => {0 or 1}",
        "!" => "A == 0 yields 1; else 0",
        "len" => "yields length of byte value A",
        "itob" => "converts uint64 A to big-endian byte array, always of length 8",
        "btoi" => "converts big-endian byte array A to uint64. Fails if len(A) > 8.",
        "%" => "A modulo B. Fail if B == 0.",
        "|" => "A bitwise-or B",
        "&" => "A bitwise-and B",
        "^" => "A bitwise-xor B",
        "~" => "bitwise invert value A",
        "mulw" => "A times B as a 128-bit result. X is the high 64 bits, Y is the low.",
        "addw" => "A plus B as a 128-bit result. X is the carry-bit, Y is the low-order 64 bits.",
        "divmodw" => "W,X = (A,B / C,D); Y,Z = (A,B modulo C,D)",
        "divw" => "A,B / C. Fail if C == 0 or if the result overflows.",
        "intcblock" => "prepare block of uint64 constants for use by intc",
        "intc" => "Ith constant from intcblock",
        "intc_0" => "constant 0 from intcblock",
        "intc_1" => "constant 1 from intcblock",
        "intc_2" => "constant 2 from intcblock",
        "intc_3" => "constant 3 from intcblock",
        "bytecblock" => "prepare block of byte-array constants for use by bytec",
        "bytec" => "Ith constant from bytecblock",
        "bytec_0" => "constant 0 from bytecblock",
        "bytec_1" => "constant 1 from bytecblock",
        "bytec_2" => "constant 2 from bytecblock",
        "bytec_3" => "constant 3 from bytecblock",
        "arg" => "Nth LogicSig argument",
        "arg_0" => "LogicSig argument 0",
        "arg_1" => "LogicSig argument 1",
        "arg_2" => "LogicSig argument 2",
        "arg_3" => "LogicSig argument 3",
        "args" => "Ath LogicSig argument",
        "txn" => "field F of the current transaction",
        "txna" => "Ith value of the array field F of the current transaction",
        "txnas" => "Ath value of the array field F of the current transaction",
        "gtxn" => "field F of the Tth transaction in the current group",
        "gtxna" => "Ith value of the array field F from the Tth transaction in the current group",
        "gtxnas" => "Ath value of the array field F from the Tth transaction in the current group",
        "gtxns" => "field F of the Ath transaction in the current group",
        "gtxnsa" => "Ith value of the array field F from the Ath transaction in the current group",
        "gtxnsas" => "Bth value of the array field F from the Ath transaction in the current group",
        "global" => "global field F",
        "load" => "Ith scratch space value. All scratch spaces are 0 at program start.",
        "store" => "store A to the Ith scratch space",
        "loads" => "Ath scratch space value. All scratch spaces are 0 at program start.",
        "stores" => "store B to the Ath scratch space",
        "gload" => "Ith scratch space value of the Tth transaction in the current group",
        "gloads" => "Ith scratch space value of the Ath transaction in the current group",
        "gloadss" => "Bth scratch space value of the Ath transaction in the current group",
        "gaid" => "ID of the asset or application created in the Tth transaction of the current group",
        "gaids" => "ID of the asset or application created in the Ath transaction of the current group",
        "bnz" => "branch to TARGET if value A is not zero",
        "bz" => "branch to TARGET if value A is zero",
        "b" => "branch unconditionally to TARGET",
        "return" => "use A as success value; end",
        "assert" => "immediately fail unless A is a non-zero number",
        "bury" => "replace the Nth value from the top of the stack with A",
        "popn" => "remove N values from the top of the stack",
        "dupn" => "duplicate A, N times",
        "pop" => "discard A",
        "dup" => "duplicate A",
        "dup2" => "duplicate A and B",
        "dig" => "Nth value from the top of the stack. dig 0 is equivalent to dup.",
        "swap" => "swaps A and B on stack",
        "select" => "selects one of two values based on top-of-stack: B if C != 0, else A",
        "cover" => "remove top of stack and place it deeper in the stack such that N elements are above it",
        "uncover" => "remove the value at depth N in the stack and shift above items down so the Nth deep value is on top",
        "concat" => "join A and B. Fail if the result would exceed 4096 bytes.",
        "substring" => "A range of bytes from A starting at S up to but not including E. Fail if E < S or E > len(A).",
        "substring3" => "A range of bytes from A starting at B up to but not including C",
        "getbit" => "Bth bit of (byte-array or integer) A",
        "setbit" => "copy of (byte-array or integer) A with the Bth bit set to (0 or 1) C",
        "getbyte" => "Bth byte of A, as an integer",
        "setbyte" => "copy of A with the Bth byte set to small integer (between 0..255) C",
        "extract" => "extract a range of bytes from A starting at S up to but not including S+L",
        "extract3" => "extract a range of bytes from A starting at B up to but not including B+C",
        "extract_uint16" => "a uint16 formed from a range of big-endian bytes from A starting at B up to but not including B+2",
        "extract_uint32" => "a uint32 formed from a range of big-endian bytes from A starting at B up to but not including B+4",
        "extract_uint64" => "a uint64 formed from a range of big-endian bytes from A starting at B up to but not including B+8",
        "replace" => "copy of A with the bytes starting at S (or B) replaced by the bytes of the last argument",
        "replace2" => "copy of A with the bytes starting at S replaced by the bytes of B",
        "replace3" => "copy of A with the bytes starting at B replaced by the bytes of C",
        "base64_decode" => "decode A which was base64-encoded using encoding E. Fail if A is not base64 encoded with encoding E.",
        "json_ref" => "key B's value, of type R, from a valid utf-8 encoded json object A",
        "balance" => "balance for account A, in microalgos. The balance is observed after the effects of previous transactions in the group.",
        "min_balance" => "minimum required balance for account A, in microalgos",
        "app_opted_in" => "1 if account A is opted in to application B, else 0",
        "app_local_get" => "local state of the key B in the current application in account A",
        "app_local_get_ex" => "X is the local state of application B, key C in account A. Y is 1 if the key existed, else 0.",
        "app_global_get" => "global state of the key A in the current application",
        "app_global_get_ex" => "X is the global state of application A, key B. Y is 1 if the key existed, else 0.",
        "app_local_put" => "write C to key B in account A's local state of the current application",
        "app_global_put" => "write B to key A in the global state of the current application",
        "app_local_del" => "delete key B from account A's local state of the current application",
        "app_global_del" => "delete key A from the global state of the current application",
        "asset_holding_get" => "X is field F from account A's holding of asset B. Y is 1 if A is opted into B, else 0.",
        "asset_params_get" => "X is field F from asset A. Y is 1 if A exists, else 0.",
        "app_params_get" => "X is field F from app A. Y is 1 if A exists, else 0.",
        "acct_params_get" => "X is field F from account A. Y is 1 if A owns positive algos, else 0.",
        "pushbytes" => "immediate BYTES",
        "pushint" => "immediate UINT",
        "pushbytess" => "push sequences of immediate byte arrays to stack",
        "pushints" => "push sequence of immediate uints to stack",
        "callsub" => "branch unconditionally to TARGET, saving the next instruction on the call stack",
        "retsub" => "pop the top instruction from the call stack and branch to it",
        "proto" => "Prepare top call frame for a retsub that will assume A args and R return values.",
        "frame_dig" => "Nth (signed) value from the frame pointer",
        "frame_bury" => "replace the Nth (signed) value from the frame pointer in the stack with A",
        "switch" => "branch to the Ath label. Continue at following instruction if index A exceeds the number of labels.",
        "match" => {
            "given match cases from A[1] to A[N], branch to the Ith label where A[I] = B. Continue to the following instruction if no matches are found."
        }
        "shl" => "A times 2^B, modulo 2^64",
        "shr" => "A divided by 2^B",
        "sqrt" => "the largest integer I such that I^2 <= A",
        "bitlen" => "the highest set bit in A. If A is a byte-array, it is interpreted as a big-endian unsigned integer. bitlen of 0 is 0, bitlen of 8 is 4.",
        "exp" => "A raised to the Bth power. Fail if A == B == 0 and on overflow.",
        "expw" => "A raised to the Bth power as a 128-bit result in two uint64s. Fail if A == B == 0 or if the results exceeds 2^128-1.",
        "bsqrt" => "the largest integer I such that I^2 <= A. A and I are interpreted as big-endian unsigned integers.",
        "ec_add" => "for curve points A and B, return the curve point A + B",
        "ec_scalar_mul" => "for curve point A and scalar B, return the curve point BA",
        "ec_pairing_check" => "1 if the product of the pairing of each point in A with its respective point in B is equal to the identity element of the target group, else 0",
        "ec_multi_exp" => "for curve points A and scalars B, return curve point B0A0 + B1A1 + ...",
        "ec_subgroup_check" => "1 if A is in the main prime-order subgroup of G, else 0",
        "ec_map_to" => "maps field element A to group G",
        "b+" => "A plus B. A and B are interpreted as big-endian unsigned integers.",
        "b-" => "A minus B. A and B are interpreted as big-endian unsigned integers. Fail on underflow.",
        "b/" => "A divided by B (truncated division). A and B are interpreted as big-endian unsigned integers. Fail if B is zero.",
        "b*" => "A times B. A and B are interpreted as big-endian unsigned integers.",
        "b<" => "1 if A is less than B, else 0. A and B are interpreted as big-endian unsigned integers.",
        "b>" => "1 if A is greater than B, else 0. A and B are interpreted as big-endian unsigned integers.",
        "b<=" => "1 if A is less than or equal to B, else 0. A and B are interpreted as big-endian unsigned integers.",
        "b>=" => "1 if A is greater than or equal to B, else 0. A and B are interpreted as big-endian unsigned integers.",
        "b==" => "1 if A equals B, else 0. A and B are interpreted as big-endian unsigned integers.",
        "b!=" => "0 if A equals B, else 1. A and B are interpreted as big-endian unsigned integers.",
        "b%" => "A modulo B. A and B are interpreted as big-endian unsigned integers. Fail if B is zero.",
        "b|" => "A bitwise-or B. A and B are zero-left extended to the greater of their lengths.",
        "b&" => "A bitwise-and B. A and B are zero-left extended to the greater of their lengths.",
        "b^" => "A bitwise-xor B. A and B are zero-left extended to the greater of their lengths.",
        "b~" => "A with all bits inverted",
        "bzero" => "zero filled byte-array of length A",
        "log" => "write A to log state of the current application",
        "itxn_begin" => "begin preparation of a new inner transaction in a new transaction group",
        "itxn_field" => "set field F of the current inner transaction to A",
        "itxn_submit" => "execute the current inner transaction group",
        "itxn_next" => "begin preparation of a new inner transaction in the same transaction group",
        "itxn" => "field F of the last inner transaction",
        "itxna" => "Ith value of the array field F of the last inner transaction",
        "itxnas" => "Ath value of the array field F of the last inner transaction",
        "gitxn" => "field F of the Tth transaction in the last inner group submitted",
        "gitxna" => "Ith value of the array field F from the Tth transaction in the last inner group submitted",
        "gitxnas" => "Ath value of the array field F from the Tth transaction in the last inner group submitted",
        "box_create" => "create a box named A, of length B. Fail if the name A is empty or B exceeds 32768.",
        "box_extract" => "read C bytes from box A, starting at offset B. Fail if A does not exist, or the byte range is outside A's size.",
        "box_replace" => "write byte-array C into box A, starting at offset B. Fail if A does not exist, or the byte range is outside A's size.",
        "box_del" => "delete box named A if it exists. Return 1 if A existed, 0 otherwise.",
        "box_len" => "X is the length of box A if A exists, else 0. Y is 1 if A exists, else 0.",
        "box_get" => "X is the contents of box A if A exists, else ''. Y is 1 if A exists, else 0.",
        "box_put" => "replaces the contents of box A with byte-array B. Fail if A exists and len(B) != len(box A).",
        "vrf_verify" => "Verify the proof B of message A against pubkey C. Returns the VRF output and verification flag.",
        "block" => "field F of block A. Fail unless A falls between txn.LastValid-1002 and txn.FirstValid (exclusive).",
        _ => "",
    }
}

pub(crate) fn op_doc_extra(name: &str) -> &'static str {
    match name {
        "bnz" | "bz" => {
            "The TARGET label may only be forward in versions before 4; from version 4 branches may jump backward as well."
        }
        "b" => "Unconditional branches may jump backward from version 4.",
        "int" => {
            "Accepts a decimal, hex, octal or binary literal, a transaction type name, or an on-completion constant name."
        }
        "byte" => {
            "Accepts a quoted string with escapes, 0x-prefixed hex, or base32/base64 data in call or keyword form."
        }
        "intcblock" | "bytecblock" => {
            "Constant blocks are normally emitted by the assembler; writing them by hand replaces the assembler-managed constant pool."
        }
        "callsub" | "retsub" => {
            "The call stack is separate from the data stack; only callsub and retsub manipulate it."
        }
        "proto" => {
            "Fails unless the last instruction executed was a callsub. Within a subroutine that uses proto, the arguments are addressable via frame_dig."
        }
        "txn" => {
            "With two immediates, behaves as txna: the second immediate indexes into the array field."
        }
        "gtxn" => {
            "With three immediates, behaves as gtxna: the last immediate indexes into the array field."
        }
        "itxn_field" => {
            "itxn_field fails if A is of the wrong type for F, including a byte array of the wrong size for use as an address when F is an address field."
        }
        _ => "",
    }
}
