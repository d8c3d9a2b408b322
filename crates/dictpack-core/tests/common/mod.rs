pub mod artifact_server;

/// Magic number shared with the header parser.
pub const MAGIC: u32 = 0x9BC1_3AFE;

/// Builds a well-formed dictionary payload: fixed prefix, optional `locale`
/// attribute, then `body` as the dictionary content.
pub fn make_artifact(locale: Option<&str>, body: &[u8]) -> Vec<u8> {
    let mut attrs = Vec::new();
    if let Some(l) = locale {
        attrs.extend_from_slice(b"locale");
        attrs.push(0);
        attrs.extend_from_slice(l.as_bytes());
        attrs.push(0);
    }
    let mut out = Vec::new();
    out.extend_from_slice(&MAGIC.to_be_bytes());
    out.extend_from_slice(&2u16.to_be_bytes()); // format version
    out.extend_from_slice(&0u16.to_be_bytes()); // flags
    out.extend_from_slice(&((12 + attrs.len()) as u32).to_be_bytes());
    out.extend_from_slice(&attrs);
    out.extend_from_slice(body);
    out
}
