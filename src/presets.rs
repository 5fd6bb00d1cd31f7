//! Named canvas sizes offered by the host. The editor only ever sees the
//! resulting width and height.

/// A named document size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub name: &'static str,
    pub width: u32,
    pub height: u32,
}

pub const PRESETS: &[Preset] = &[
    Preset { name: "default", width: 1200, height: 800 },
    Preset { name: "hd", width: 1920, height: 1080 },
    Preset { name: "youtube-thumbnail", width: 1280, height: 720 },
    Preset { name: "instagram-post", width: 1080, height: 1080 },
    Preset { name: "instagram-story", width: 1080, height: 1920 },
    Preset { name: "twitter-post", width: 1200, height: 675 },
    Preset { name: "facebook-cover", width: 820, height: 312 },
    Preset { name: "a4-portrait", width: 794, height: 1123 },
    Preset { name: "a4-landscape", width: 1123, height: 794 },
    Preset { name: "letter", width: 816, height: 1056 },
];

/// Look a preset up by name, ignoring case
pub fn find(name: &str) -> Option<Preset> {
    PRESETS.iter().copied().find(|p| p.name.eq_ignore_ascii_case(name))
}

/// Parse `WIDTHxHEIGHT`
pub fn parse_size(s: &str) -> Option<(u32, u32)> {
    let (w, h) = s.trim().split_once(['x', 'X'])?;
    let w: u32 = w.trim().parse().ok()?;
    let h: u32 = h.trim().parse().ok()?;
    (w > 0 && h > 0).then_some((w, h))
}
