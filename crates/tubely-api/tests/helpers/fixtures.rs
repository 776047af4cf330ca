use axum_test::multipart::{MultipartForm, Part};

/// PNG signature plus padding; nothing decodes image bytes server-side.
pub fn png_bytes() -> Vec<u8> {
    let mut data = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    data.extend_from_slice(&[0u8; 56]);
    data
}

/// A stand-in MP4 body; the stub prober supplies its geometry.
pub fn mp4_bytes() -> Vec<u8> {
    let mut data = vec![0, 0, 0, 0x18, b'f', b't', b'y', b'p', b'm', b'p', b'4', b'2'];
    data.extend_from_slice(&[0u8; 500]);
    data
}

pub fn single_part(field: &str, data: Vec<u8>, file_name: &str, mime_type: &str) -> MultipartForm {
    let part = Part::bytes(data).file_name(file_name).mime_type(mime_type);
    MultipartForm::new().add_part(field.to_string(), part)
}

pub fn thumbnail_form(data: Vec<u8>, mime_type: &str) -> MultipartForm {
    single_part("thumbnail", data, "thumb.png", mime_type)
}

pub fn video_form(data: Vec<u8>) -> MultipartForm {
    single_part("video", data, "clip.mp4", "video/mp4")
}
