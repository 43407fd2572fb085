//! Interpreting error kinds.
//!
//! `InterpretingError` is the closed set of error kinds a script can observe
//! as ERROR values and through the `$LANG_ERRNO` slot. Every kind has a stable
//! numeric code: positive codes are errors, zero is "no error", and negative
//! codes are warnings.

use std::fmt;

/// Error kind carried by ERROR values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InterpretingError {
    NoError,

    // Errors
    FinalVarChange,
    ToManyInnerLinks,
    NoLangFile,
    FileNotFound,
    InvalidFuncPtr,
    StackOverflow,
    NoTerminal,
    InvalidArgCount,
    InvalidLogLevel,
    InvalidArrPtr,
    NoHexNum,
    NoChar,
    NoNum,
    DivByZero,
    NegativeArrayLen,
    EmptyArray,
    LengthNan,
    IndexOutOfBounds,
    ArgCountNotArrLen,
    InvalidFuncPtrLoop,
    InvalidArguments,
    FunctionNotFound,
    Eof,
    SystemError,
    NegativeRepeatCount,
    LangReqNotFound,
    FunctionNotSupported,
    BracketMismatch,
    ContFlowArgMissing,
    InvalidAstNode,
    InvalidPtr,
    IncompatibleDataType,
    LangArraysCopy,
    LangVerError,
    InvalidConPart,
    InvalidFormat,
    InvalidAssignment,
    NoBinNum,
    NoOctNum,
    NoBaseNNum,
    InvalidNumberBase,
    InvalidRegexSyntax,
    InvalidTemplateSyntax,
    InvalidModule,
    ModuleLoadUnloadErr,
    MemberNotAccessible,

    // Warnings
    DeprecatedFuncCall,
    NoTerminalWarning,
    LangVerWarning,
    InvalidExecFlagData,
    VarShadowingWarning,
    UndefEscapeSequence,
    InvalidDocComment,
}

impl InterpretingError {
    /// Every kind, in declaration order.
    pub const ALL: [InterpretingError; 54] = [
        Self::NoError,
        Self::FinalVarChange,
        Self::ToManyInnerLinks,
        Self::NoLangFile,
        Self::FileNotFound,
        Self::InvalidFuncPtr,
        Self::StackOverflow,
        Self::NoTerminal,
        Self::InvalidArgCount,
        Self::InvalidLogLevel,
        Self::InvalidArrPtr,
        Self::NoHexNum,
        Self::NoChar,
        Self::NoNum,
        Self::DivByZero,
        Self::NegativeArrayLen,
        Self::EmptyArray,
        Self::LengthNan,
        Self::IndexOutOfBounds,
        Self::ArgCountNotArrLen,
        Self::InvalidFuncPtrLoop,
        Self::InvalidArguments,
        Self::FunctionNotFound,
        Self::Eof,
        Self::SystemError,
        Self::NegativeRepeatCount,
        Self::LangReqNotFound,
        Self::FunctionNotSupported,
        Self::BracketMismatch,
        Self::ContFlowArgMissing,
        Self::InvalidAstNode,
        Self::InvalidPtr,
        Self::IncompatibleDataType,
        Self::LangArraysCopy,
        Self::LangVerError,
        Self::InvalidConPart,
        Self::InvalidFormat,
        Self::InvalidAssignment,
        Self::NoBinNum,
        Self::NoOctNum,
        Self::NoBaseNNum,
        Self::InvalidNumberBase,
        Self::InvalidRegexSyntax,
        Self::InvalidTemplateSyntax,
        Self::InvalidModule,
        Self::ModuleLoadUnloadErr,
        Self::MemberNotAccessible,
        Self::DeprecatedFuncCall,
        Self::NoTerminalWarning,
        Self::LangVerWarning,
        Self::InvalidExecFlagData,
        Self::VarShadowingWarning,
        Self::UndefEscapeSequence,
        Self::InvalidDocComment,
    ];

    /// Stable numeric code.
    pub fn code(self) -> i32 {
        match self {
            Self::NoError => 0,
            Self::FinalVarChange => 1,
            Self::ToManyInnerLinks => 2,
            Self::NoLangFile => 3,
            Self::FileNotFound => 4,
            Self::InvalidFuncPtr => 5,
            Self::StackOverflow => 6,
            Self::NoTerminal => 7,
            Self::InvalidArgCount => 8,
            Self::InvalidLogLevel => 9,
            Self::InvalidArrPtr => 10,
            Self::NoHexNum => 11,
            Self::NoChar => 12,
            Self::NoNum => 13,
            Self::DivByZero => 14,
            Self::NegativeArrayLen => 15,
            Self::EmptyArray => 16,
            Self::LengthNan => 17,
            Self::IndexOutOfBounds => 18,
            Self::ArgCountNotArrLen => 19,
            Self::InvalidFuncPtrLoop => 20,
            Self::InvalidArguments => 21,
            Self::FunctionNotFound => 22,
            Self::Eof => 23,
            Self::SystemError => 24,
            Self::NegativeRepeatCount => 25,
            Self::LangReqNotFound => 26,
            Self::FunctionNotSupported => 27,
            Self::BracketMismatch => 28,
            Self::ContFlowArgMissing => 29,
            Self::InvalidAstNode => 30,
            Self::InvalidPtr => 31,
            Self::IncompatibleDataType => 32,
            Self::LangArraysCopy => 33,
            Self::LangVerError => 34,
            Self::InvalidConPart => 35,
            Self::InvalidFormat => 36,
            Self::InvalidAssignment => 37,
            Self::NoBinNum => 38,
            Self::NoOctNum => 39,
            Self::NoBaseNNum => 40,
            Self::InvalidNumberBase => 41,
            Self::InvalidRegexSyntax => 42,
            Self::InvalidTemplateSyntax => 43,
            Self::InvalidModule => 44,
            Self::ModuleLoadUnloadErr => 45,
            Self::MemberNotAccessible => 46,
            Self::DeprecatedFuncCall => -1,
            Self::NoTerminalWarning => -2,
            Self::LangVerWarning => -3,
            Self::InvalidExecFlagData => -4,
            Self::VarShadowingWarning => -5,
            Self::UndefEscapeSequence => -6,
            Self::InvalidDocComment => -7,
        }
    }

    /// Look up a kind by its numeric code.
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.code() == code)
    }

    /// Upper-snake-case name, used for `$LANG_ERROR_<NAME>` constants.
    pub fn name(self) -> &'static str {
        match self {
            Self::NoError => "NO_ERROR",
            Self::FinalVarChange => "FINAL_VAR_CHANGE",
            Self::ToManyInnerLinks => "TO_MANY_INNER_LINKS",
            Self::NoLangFile => "NO_LANG_FILE",
            Self::FileNotFound => "FILE_NOT_FOUND",
            Self::InvalidFuncPtr => "INVALID_FUNC_PTR",
            Self::StackOverflow => "STACK_OVERFLOW",
            Self::NoTerminal => "NO_TERMINAL",
            Self::InvalidArgCount => "INVALID_ARG_COUNT",
            Self::InvalidLogLevel => "INVALID_LOG_LEVEL",
            Self::InvalidArrPtr => "INVALID_ARR_PTR",
            Self::NoHexNum => "NO_HEX_NUM",
            Self::NoChar => "NO_CHAR",
            Self::NoNum => "NO_NUM",
            Self::DivByZero => "DIV_BY_ZERO",
            Self::NegativeArrayLen => "NEGATIVE_ARRAY_LEN",
            Self::EmptyArray => "EMPTY_ARRAY",
            Self::LengthNan => "LENGTH_NAN",
            Self::IndexOutOfBounds => "INDEX_OUT_OF_BOUNDS",
            Self::ArgCountNotArrLen => "ARG_COUNT_NOT_ARR_LEN",
            Self::InvalidFuncPtrLoop => "INVALID_FUNC_PTR_LOOP",
            Self::InvalidArguments => "INVALID_ARGUMENTS",
            Self::FunctionNotFound => "FUNCTION_NOT_FOUND",
            Self::Eof => "EOF",
            Self::SystemError => "SYSTEM_ERROR",
            Self::NegativeRepeatCount => "NEGATIVE_REPEAT_COUNT",
            Self::LangReqNotFound => "LANG_REQ_NOT_FOUND",
            Self::FunctionNotSupported => "FUNCTION_NOT_SUPPORTED",
            Self::BracketMismatch => "BRACKET_MISMATCH",
            Self::ContFlowArgMissing => "CONT_FLOW_ARG_MISSING",
            Self::InvalidAstNode => "INVALID_AST_NODE",
            Self::InvalidPtr => "INVALID_PTR",
            Self::IncompatibleDataType => "INCOMPATIBLE_DATA_TYPE",
            Self::LangArraysCopy => "LANG_ARRAYS_COPY",
            Self::LangVerError => "LANG_VER_ERROR",
            Self::InvalidConPart => "INVALID_CON_PART",
            Self::InvalidFormat => "INVALID_FORMAT",
            Self::InvalidAssignment => "INVALID_ASSIGNMENT",
            Self::NoBinNum => "NO_BIN_NUM",
            Self::NoOctNum => "NO_OCT_NUM",
            Self::NoBaseNNum => "NO_BASE_N_NUM",
            Self::InvalidNumberBase => "INVALID_NUMBER_BASE",
            Self::InvalidRegexSyntax => "INVALID_REGEX_SYNTAX",
            Self::InvalidTemplateSyntax => "INVALID_TEMPLATE_SYNTAX",
            Self::InvalidModule => "INVALID_MODULE",
            Self::ModuleLoadUnloadErr => "MODULE_LOAD_UNLOAD_ERR",
            Self::MemberNotAccessible => "MEMBER_NOT_ACCESSIBLE",
            Self::DeprecatedFuncCall => "DEPRECATED_FUNC_CALL",
            Self::NoTerminalWarning => "NO_TERMINAL_WARNING",
            Self::LangVerWarning => "LANG_VER_WARNING",
            Self::InvalidExecFlagData => "INVALID_EXEC_FLAG_DATA",
            Self::VarShadowingWarning => "VAR_SHADOWING_WARNING",
            Self::UndefEscapeSequence => "UNDEF_ESCAPE_SEQUENCE",
            Self::InvalidDocComment => "INVALID_DOC_COMMENT",
        }
    }

    /// Human-readable description.
    pub fn description(self) -> &'static str {
        match self {
            Self::NoError => "No Error",
            Self::FinalVarChange => "LANG or final vars must not be changed",
            Self::ToManyInnerLinks => "To many inner links",
            Self::NoLangFile => "No .lang-File",
            Self::FileNotFound => "File not found",
            Self::InvalidFuncPtr => "Function pointer is invalid",
            Self::StackOverflow => "Stack overflow",
            Self::NoTerminal => "No terminal available",
            Self::InvalidArgCount => "Invalid argument count",
            Self::InvalidLogLevel => "Invalid log level",
            Self::InvalidArrPtr => "Invalid array pointer",
            Self::NoHexNum => "No hexadecimal number",
            Self::NoChar => "No char",
            Self::NoNum => "No number",
            Self::DivByZero => "Dividing by 0",
            Self::NegativeArrayLen => "Negative array length",
            Self::EmptyArray => "Empty array",
            Self::LengthNan => "Length NAN",
            Self::IndexOutOfBounds => "Array index out of bounds",
            Self::ArgCountNotArrLen => "Argument count is not array length",
            Self::InvalidFuncPtrLoop => "Invalid function pointer",
            Self::InvalidArguments => "Invalid arguments",
            Self::FunctionNotFound => "Function not found",
            Self::Eof => "End of file was reached early",
            Self::SystemError => "System Error",
            Self::NegativeRepeatCount => "Negative repeat count",
            Self::LangReqNotFound => "Lang request doesn't exist",
            Self::FunctionNotSupported => "Function not supported",
            Self::BracketMismatch => "Bracket mismatch",
            Self::ContFlowArgMissing => {
                "Control flow statement condition(s) or argument(s) is/are missing"
            }
            Self::InvalidAstNode => "Invalid AST node or AST node order",
            Self::InvalidPtr => "Invalid pointer",
            Self::IncompatibleDataType => "Incompatible data type",
            Self::LangArraysCopy => "&LANG arrays can not be copied",
            Self::LangVerError => "Lang file's version is not compatible with this version",
            Self::InvalidConPart => "Invalid statement in control flow statement",
            Self::InvalidFormat => "Invalid format sequence",
            Self::InvalidAssignment => "Invalid assignment",
            Self::NoBinNum => "No binary number",
            Self::NoOctNum => "No octal number",
            Self::NoBaseNNum => "Number is not in base N",
            Self::InvalidNumberBase => "Invalid number base",
            Self::InvalidRegexSyntax => "Invalid RegEx syntax",
            Self::InvalidTemplateSyntax => "Invalid translation template syntax",
            Self::InvalidModule => "The Lang module is invalid",
            Self::ModuleLoadUnloadErr => "Error during load or unload of Lang module",
            Self::MemberNotAccessible => {
                "The class/object member is not visible/accessible from the current scope"
            }
            Self::DeprecatedFuncCall => "A deprecated predefined function was called",
            Self::NoTerminalWarning => "No terminal available",
            Self::LangVerWarning => "Lang file's version is not compatible with this version",
            Self::InvalidExecFlagData => "Execution flag or Lang data is invalid",
            Self::VarShadowingWarning => "Variable name shadows an other variable",
            Self::UndefEscapeSequence => "An undefined escape sequence was used",
            Self::InvalidDocComment => "Dangling or invalid doc comment syntax",
        }
    }

    /// Returns `true` for warning kinds (negative codes).
    #[inline]
    pub fn is_warning(self) -> bool {
        self.code() < 0
    }
}

impl fmt::Display for InterpretingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
