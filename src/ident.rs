use sha2::{Digest, Sha256};

const ID_LEN: usize = 8;

/// Stable component id for `exported` inside module `module_id`.
///
/// The HMR runtime matches the old and new definition of a component across
/// an edit by this id, so it must depend only on the module identity and the
/// export name, never on the module contents.
pub fn synth(module_id: &str, exported: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(module_id.as_bytes());
    hasher.update(exported.as_bytes());
    let mut digest = format!("{:x}", hasher.finalize());
    digest.truncate(ID_LEN);
    digest
}
