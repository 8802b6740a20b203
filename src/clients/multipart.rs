//! Multipart form encoding with content-sniffed file parts.
//!
//! The Onfido API rejects uploads whose declared content type does not match
//! the file bytes (`application/octet-stream` is refused as spoofed), so file
//! parts are labelled from their leading bytes rather than the file name.
//!
//! Forms are encoded into a single byte buffer up front. A retried upload
//! therefore resends exactly the same bytes.

use rand::Rng;

/// Number of leading bytes considered when sniffing a content type.
const SNIFF_LEN: usize = 512;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Part {
    Field {
        name: String,
        value: String,
    },
    File {
        name: String,
        filename: String,
        content: Vec<u8>,
    },
}

/// A `multipart/form-data` body under construction.
///
/// # Example
///
/// ```rust
/// use onfido::clients::MultipartForm;
///
/// let form = MultipartForm::new()
///     .text("type", "passport")
///     .file("file", "passport.png", b"\x89PNG\r\n\x1a\n....".to_vec());
///
/// let (content_type, bytes) = form.encode();
/// assert!(content_type.starts_with("multipart/form-data; boundary="));
/// assert!(String::from_utf8_lossy(&bytes).contains("Content-Type: image/png"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MultipartForm {
    parts: Vec<Part>,
}

impl MultipartForm {
    /// Creates an empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a text field.
    #[must_use]
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(Part::Field {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Adds a file part.
    #[must_use]
    pub fn file(
        mut self,
        name: impl Into<String>,
        filename: impl Into<String>,
        content: Vec<u8>,
    ) -> Self {
        self.parts.push(Part::File {
            name: name.into(),
            filename: filename.into(),
            content,
        });
        self
    }

    /// Returns `true` if no parts were added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Encodes the form with a random boundary.
    ///
    /// Returns the `Content-Type` header value and the encoded body.
    #[must_use]
    pub fn encode(&self) -> (String, Vec<u8>) {
        let boundary = random_boundary();
        let body = self.encode_with_boundary(&boundary);
        (format!("multipart/form-data; boundary={boundary}"), body)
    }

    fn encode_with_boundary(&self, boundary: &str) -> Vec<u8> {
        let mut out = Vec::new();
        for part in &self.parts {
            out.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
            match part {
                Part::Field { name, value } => {
                    out.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                            escape_quotes(name)
                        )
                        .as_bytes(),
                    );
                    out.extend_from_slice(value.as_bytes());
                }
                Part::File {
                    name,
                    filename,
                    content,
                } => {
                    out.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                            escape_quotes(name),
                            escape_quotes(filename),
                            sniff_content_type(content)
                        )
                        .as_bytes(),
                    );
                    out.extend_from_slice(content);
                }
            }
            out.extend_from_slice(b"\r\n");
        }
        out.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
        out
    }
}

fn random_boundary() -> String {
    let mut rng = rand::thread_rng();
    (0..30).map(|_| format!("{:02x}", rng.gen::<u8>())).collect()
}

fn escape_quotes(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Determines the MIME type of `data` from its leading bytes.
///
/// Recognizes the document, image and video formats accepted for identity
/// documents. Anything else is reported as `text/plain; charset=utf-8` when
/// it contains no binary control bytes, and `application/octet-stream`
/// otherwise.
///
/// # Example
///
/// ```rust
/// use onfido::clients::sniff_content_type;
///
/// assert_eq!(sniff_content_type(b"%PDF-1.7\n"), "application/pdf");
/// assert_eq!(sniff_content_type(b"\xFF\xD8\xFF\xE0"), "image/jpeg");
/// assert_eq!(sniff_content_type(b"hello"), "text/plain; charset=utf-8");
/// ```
#[must_use]
pub fn sniff_content_type(data: &[u8]) -> &'static str {
    let head = &data[..data.len().min(SNIFF_LEN)];

    if head.starts_with(b"%PDF-") {
        return "application/pdf";
    }
    if head.starts_with(b"\x89PNG\r\n\x1a\n") {
        return "image/png";
    }
    if head.starts_with(b"\xFF\xD8\xFF") {
        return "image/jpeg";
    }
    if head.starts_with(b"GIF87a") || head.starts_with(b"GIF89a") {
        return "image/gif";
    }
    if head.len() >= 14 && head.starts_with(b"RIFF") && &head[8..14] == b"WEBPVP" {
        return "image/webp";
    }
    if head.starts_with(b"BM") {
        return "image/bmp";
    }
    if head.len() >= 12 && &head[4..8] == b"ftyp" {
        return iso_media_type(&head[8..12]);
    }
    if head.starts_with(b"\x1A\x45\xDF\xA3") {
        return "video/webm";
    }
    if head.starts_with(b"PK\x03\x04") {
        return "application/zip";
    }

    if head.iter().any(|&b| is_binary_byte(b)) {
        "application/octet-stream"
    } else {
        "text/plain; charset=utf-8"
    }
}

/// Maps the major brand of an ISO base media `ftyp` box to a MIME type.
fn iso_media_type(brand: &[u8]) -> &'static str {
    match brand {
        b"qt  " => "video/quicktime",
        b"heic" | b"heix" | b"heim" | b"heis" | b"hevc" | b"hevx" => "image/heic",
        b"mif1" | b"msf1" => "image/heif",
        b"avif" | b"avis" => "image/avif",
        b"3g2a" | b"3g2b" | b"3g2c" => "video/3gpp2",
        _ if brand.starts_with(b"3gp") => "video/3gpp",
        _ => "video/mp4",
    }
}

const fn is_binary_byte(b: u8) -> bool {
    matches!(b, 0x00..=0x08 | 0x0B | 0x0E..=0x1A | 0x1C..=0x1F)
}
