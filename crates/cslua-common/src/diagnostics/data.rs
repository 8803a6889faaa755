//! Diagnostic message table.
//!
//! Codes are grouped by taxonomy:
//! - 1xxx: constructs with no lowering at all
//! - 2xxx: extern usage rejected by the rule policy
//! - 3xxx: extension methods

use super::{DiagnosticCategory, DiagnosticMessage};

pub mod diagnostic_codes {
    pub const UNSUPPORTED_QUERY_SYNTAX: u32 = 1001;
    pub const UNSUPPORTED_CASE_PATTERN: u32 = 1002;
    pub const UNSUPPORTED_IS_PATTERN: u32 = 1003;
    pub const UNSUPPORTED_LOCAL_FUNCTION: u32 = 1004;

    pub const UNSUPPORTED_EXTERN_EVENT: u32 = 2001;
    pub const UNSUPPORTED_EXTERN_PROPERTY: u32 = 2002;
    pub const UNSUPPORTED_EXTERN_FIELD: u32 = 2003;
    pub const UNSUPPORTED_EXTERN_METHOD: u32 = 2004;
    pub const UNSUPPORTED_EXTERN_TYPE_FROM_MEMBER_ACCESS: u32 = 2005;
    pub const UNSUPPORTED_EXTERN_TYPE_FROM_INVOCATION: u32 = 2006;
    pub const UNSUPPORTED_EXTERN_TYPE: u32 = 2007;
    pub const UNSUPPORTED_CONVERSION: u32 = 2008;
    pub const LOCAL_CONTAINER_AS_EXTERN_INTERFACE: u32 = 2009;

    pub const UNSUPPORTED_EXTENSION_METHOD: u32 = 3001;
}

pub mod diagnostic_messages {
    pub const UNSUPPORTED_QUERY_SYNTAX: &str = "[cslua] Unsupported linq syntax '{0}' !";
    pub const UNSUPPORTED_CASE_PATTERN: &str = "[cslua] Unsupported 'case pattern' syntax !";
    pub const UNSUPPORTED_IS_PATTERN: &str = "[cslua] Unsupported 'is pattern' syntax !";
    pub const UNSUPPORTED_LOCAL_FUNCTION: &str = "[cslua] Unsupported 'local function' syntax !";

    pub const UNSUPPORTED_EXTERN_EVENT: &str = "[cslua] Unsupported 'extern event' '{0}' !";
    pub const UNSUPPORTED_EXTERN_PROPERTY: &str = "[cslua] Unsupported 'extern property' '{0}' !";
    pub const UNSUPPORTED_EXTERN_FIELD: &str = "[cslua] Unsupported 'extern field' '{0}' !";
    pub const UNSUPPORTED_EXTERN_METHOD: &str = "[cslua] Unsupported 'extern method' '{0}' !";
    pub const UNSUPPORTED_EXTERN_TYPE_FROM_MEMBER_ACCESS: &str =
        "[cslua] Unsupported 'extern type from member access' '{0}' !";
    pub const UNSUPPORTED_EXTERN_TYPE_FROM_INVOCATION: &str =
        "[cslua] Unsupported 'extern type from invocation's parameters or return' '{0}' !";
    pub const UNSUPPORTED_EXTERN_TYPE: &str = "[cslua] Unsupported 'extern type' '{0}' !";
    pub const UNSUPPORTED_CONVERSION: &str =
        "[cslua] Unsupported conversion from '{0}' to '{1}' !";
    pub const LOCAL_CONTAINER_AS_EXTERN_INTERFACE: &str =
        "[cslua] Unsupported local container '{0}' passed as extern '{1}' !";

    pub const UNSUPPORTED_EXTENSION_METHOD: &str =
        "[cslua] Unsupported 'extension method' '{0}' !";
}

const fn error(code: u32, message: &'static str) -> DiagnosticMessage {
    DiagnosticMessage {
        code,
        category: DiagnosticCategory::Error,
        message,
    }
}

pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    error(
        diagnostic_codes::UNSUPPORTED_QUERY_SYNTAX,
        diagnostic_messages::UNSUPPORTED_QUERY_SYNTAX,
    ),
    error(
        diagnostic_codes::UNSUPPORTED_CASE_PATTERN,
        diagnostic_messages::UNSUPPORTED_CASE_PATTERN,
    ),
    error(
        diagnostic_codes::UNSUPPORTED_IS_PATTERN,
        diagnostic_messages::UNSUPPORTED_IS_PATTERN,
    ),
    error(
        diagnostic_codes::UNSUPPORTED_LOCAL_FUNCTION,
        diagnostic_messages::UNSUPPORTED_LOCAL_FUNCTION,
    ),
    error(
        diagnostic_codes::UNSUPPORTED_EXTERN_EVENT,
        diagnostic_messages::UNSUPPORTED_EXTERN_EVENT,
    ),
    error(
        diagnostic_codes::UNSUPPORTED_EXTERN_PROPERTY,
        diagnostic_messages::UNSUPPORTED_EXTERN_PROPERTY,
    ),
    error(
        diagnostic_codes::UNSUPPORTED_EXTERN_FIELD,
        diagnostic_messages::UNSUPPORTED_EXTERN_FIELD,
    ),
    error(
        diagnostic_codes::UNSUPPORTED_EXTERN_METHOD,
        diagnostic_messages::UNSUPPORTED_EXTERN_METHOD,
    ),
    error(
        diagnostic_codes::UNSUPPORTED_EXTERN_TYPE_FROM_MEMBER_ACCESS,
        diagnostic_messages::UNSUPPORTED_EXTERN_TYPE_FROM_MEMBER_ACCESS,
    ),
    error(
        diagnostic_codes::UNSUPPORTED_EXTERN_TYPE_FROM_INVOCATION,
        diagnostic_messages::UNSUPPORTED_EXTERN_TYPE_FROM_INVOCATION,
    ),
    error(
        diagnostic_codes::UNSUPPORTED_EXTERN_TYPE,
        diagnostic_messages::UNSUPPORTED_EXTERN_TYPE,
    ),
    error(
        diagnostic_codes::UNSUPPORTED_CONVERSION,
        diagnostic_messages::UNSUPPORTED_CONVERSION,
    ),
    error(
        diagnostic_codes::LOCAL_CONTAINER_AS_EXTERN_INTERFACE,
        diagnostic_messages::LOCAL_CONTAINER_AS_EXTERN_INTERFACE,
    ),
    error(
        diagnostic_codes::UNSUPPORTED_EXTENSION_METHOD,
        diagnostic_messages::UNSUPPORTED_EXTENSION_METHOD,
    ),
];
