//! Magic-byte sniffing and header-level dimension probing for uploads.
//! Only the container headers are read here; decoding and resizing are the
//! processor's concern.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Webp,
}

impl ImageFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Webp => "image/webp",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Gif => "gif",
            ImageFormat::Webp => "webp",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ImageInfo {
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

/// Identify the format and pixel dimensions of an uploaded file, or `None`
/// when it is not a supported image.
pub fn probe(data: &[u8]) -> Option<ImageInfo> {
    if data.starts_with(b"\x89PNG\r\n\x1a\n") {
        return probe_png(data);
    }
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return probe_jpeg(data);
    }
    if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        return probe_gif(data);
    }
    if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
        return probe_webp(data);
    }
    None
}

fn be32(data: &[u8], at: usize) -> Option<u32> {
    data.get(at..at + 4)
        .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
}

fn le16(data: &[u8], at: usize) -> Option<u32> {
    data.get(at..at + 2)
        .map(|b| u16::from_le_bytes([b[0], b[1]]) as u32)
}

fn le24(data: &[u8], at: usize) -> Option<u32> {
    data.get(at..at + 3)
        .map(|b| b[0] as u32 | (b[1] as u32) << 8 | (b[2] as u32) << 16)
}

fn probe_png(data: &[u8]) -> Option<ImageInfo> {
    // IHDR is mandated to be the first chunk: width/height at offsets 16/20.
    if data.get(12..16)? != b"IHDR" {
        return None;
    }
    Some(ImageInfo {
        format: ImageFormat::Png,
        width: be32(data, 16)?,
        height: be32(data, 20)?,
    })
}

fn probe_jpeg(data: &[u8]) -> Option<ImageInfo> {
    // Walk segment markers to the first SOF.
    let mut pos = 2usize;
    while pos + 9 < data.len() {
        if data[pos] != 0xFF {
            return None;
        }
        let marker = data[pos + 1];
        // Standalone markers carry no length.
        if (0xD0..=0xD9).contains(&marker) || marker == 0x01 {
            pos += 2;
            continue;
        }
        let len = ((data[pos + 2] as usize) << 8 | data[pos + 3] as usize).max(2);
        let is_sof = matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC);
        if is_sof {
            let height = (data[pos + 5] as u32) << 8 | data[pos + 6] as u32;
            let width = (data[pos + 7] as u32) << 8 | data[pos + 8] as u32;
            return Some(ImageInfo {
                format: ImageFormat::Jpeg,
                width,
                height,
            });
        }
        pos += 2 + len;
    }
    None
}

fn probe_gif(data: &[u8]) -> Option<ImageInfo> {
    Some(ImageInfo {
        format: ImageFormat::Gif,
        width: le16(data, 6)?,
        height: le16(data, 8)?,
    })
}

fn probe_webp(data: &[u8]) -> Option<ImageInfo> {
    let chunk = data.get(12..16)?;
    let (width, height) = match chunk {
        b"VP8X" => (le24(data, 24)? + 1, le24(data, 27)? + 1),
        b"VP8 " => {
            // Lossy bitstream: frame tag then 14-bit dimensions.
            if data.get(23..26)? != [0x9D, 0x01, 0x2A] {
                return None;
            }
            (le16(data, 26)? & 0x3FFF, le16(data, 28)? & 0x3FFF)
        }
        b"VP8L" => {
            if *data.get(20)? != 0x2F {
                return None;
            }
            let b = data.get(21..25)?;
            let w = 1 + ((b[0] as u32) | ((b[1] as u32 & 0x3F) << 8));
            let h = 1 + (((b[1] as u32) >> 6) | ((b[2] as u32) << 2) | ((b[3] as u32 & 0x0F) << 10));
            (w, h)
        }
        _ => return None,
    };
    Some(ImageInfo {
        format: ImageFormat::Webp,
        width,
        height,
    })
}
