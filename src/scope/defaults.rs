use tracing::debug;

use super::{ScopeId, Scopes};
use crate::signatures;

/// Keys defined in the root scope before any configuration is read.
pub const DEFAULT_KEYS: &[(&str, &str)] = &[
    ("_LineCommentString_", ">xil>"),
    ("_BlockStartString_", "{{"),
    ("_BlockEndString_", "}}"),
    ("_SpacesPerTab_", "4"),
    ("_PreStringWrap_", "0"),
    ("_IdPrefix_", "xil_"),
    ("_UnsignedBlockSigName_", "anonymous"),
    ("_UnsignedBlockSigSubstitute_", "p"),
    ("_Natural_", "true"),
    ("_NaturalSig_", "h1"),
    ("_FootnoteStyle_", "modern"),
    ("_WarnOnSigOverride_", "true"),
    ("_DebugReportRawBlocks_", "false"),
    ("_OutputExtension_", "html"),
    ("_InputExtension_", "xil"),
    ("prolog", "true"),
    ("epilog", "true"),
    ("doctype", "strict"),
    ("charset", "iso-8859-1"),
];

/// Seed a root scope with the default keys and the standard signatures.
pub fn install(scopes: &mut Scopes, root: ScopeId) {
    for (key, value) in DEFAULT_KEYS {
        scopes.define(root, key, value);
    }

    let templates = signatures::standard();
    debug!("Installing {} standard signatures", templates.len());
    for template in templates {
        scopes.insert(root, template);
    }
}
