#![doc = r#"
Import/export of PSF-style string tag maps.

Player front-ends and tagging tools describe SPC metadata as a flat
`name=value` map (`title`, `game`, `length`, `fade`, ...). This module maps
that vocabulary onto the typed [`TagStore`]: official names first, then the
unofficial extensions (`created_at`, `soundtrack`, `intro`, `mute`, ...).
Unparsable values are reported and skipped; an import never aborts.
"#]

use super::{EmulatorId, TagId, TagStore};
use crate::time::{DumpedDate, ticks_to_time_string, time_string_to_ticks};
use alloc::{
    collections::BTreeMap,
    format,
    string::{String, ToString},
    vec::Vec,
};
use thiserror::Error;

/// A PSF tag entry that could not be applied.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PsfTagError {
    /// The value was not a decimal number.
    #[error("illegal number format: {name}")]
    Number {
        /// PSF tag name.
        name: String,
    },
    /// The value was not a parsable time string.
    #[error("illegal time format: {name}")]
    Time {
        /// PSF tag name.
        name: String,
    },
    /// The value was not a parsable date string.
    #[error("illegal date format: {name}")]
    Date {
        /// PSF tag name.
        name: String,
    },
    /// The value was neither an emulator code nor a known emulator name.
    #[error("unable to parse emulator id/name")]
    Emulator,
    /// The tag name has no SPC counterpart and was dropped.
    #[error("\"{name}\" tag is ignored")]
    Ignored {
        /// PSF tag name.
        name: String,
    },
}

impl TagStore {
    /// Applies a PSF-style tag map to the store.
    ///
    /// Returns one [`PsfTagError`] per entry that could not be applied;
    /// all other entries take effect regardless.
    pub fn import_psf(&mut self, psf: &BTreeMap<String, String>) -> Vec<PsfTagError> {
        let mut errors = Vec::new();

        for (name, value) in psf {
            match name.as_str() {
                "title" => self.set_string(TagId::SongName, value),
                "artist" => self.set_string(TagId::ArtistName, value),
                "game" => self.set_string(TagId::GameName, value),
                "comment" => self.set_string(TagId::Comment, value),
                "copyright" => self.set_string(TagId::PublisherName, value),
                "snsfby" | "spcby" => self.set_string(TagId::DumperName, value),
                "soundtrack" => self.set_string(TagId::OstTitle, value),
                "year" => self.import_length_field(TagId::CopyrightYear, name, value, &mut errors),
                "emulator" => self.import_emulator(value, &mut errors),
                "volume" => self.import_volume(value, &mut errors),
                "length" => {
                    self.remove(TagId::IntroLength);
                    self.remove(TagId::LoopLength);
                    self.remove(TagId::LoopCount);
                    self.remove(TagId::EndLength);
                    if !value.is_empty() {
                        match time_string_to_ticks(value) {
                            Ok(ticks) => self.set_integer(TagId::IntroLength, ticks, 4),
                            Err(_) => errors.push(PsfTagError::Time { name: name.clone() }),
                        }
                    }
                }
                "fade" => self.import_time_field(TagId::FadeLength, name, value, &mut errors),
                "created_at" => {
                    if value.is_empty() {
                        self.remove(TagId::DumpedDate);
                    } else {
                        match DumpedDate::parse(value) {
                            Ok(date) => self.set_integer(TagId::DumpedDate, date.packed(), 4),
                            Err(_) => errors.push(PsfTagError::Date { name: name.clone() }),
                        }
                    }
                }
                "disc" => self.import_length_field(TagId::OstDisc, name, value, &mut errors),
                "track" => self.import_track(value, &mut errors),
                "intro" => self.import_time_field(TagId::IntroLength, name, value, &mut errors),
                "loop" => self.import_time_field(TagId::LoopLength, name, value, &mut errors),
                "end" => self.import_time_field(TagId::EndLength, name, value, &mut errors),
                "mute" => self.import_length_field(TagId::MutedVoices, name, value, &mut errors),
                "loopcount" => self.import_length_field(TagId::LoopCount, name, value, &mut errors),
                _ => errors.push(PsfTagError::Ignored { name: name.clone() }),
            }
        }

        errors
    }

    fn import_length_field(
        &mut self,
        id: TagId,
        name: &str,
        value: &str,
        errors: &mut Vec<PsfTagError>,
    ) {
        if value.is_empty() {
            self.remove(id);
        } else {
            match value.parse::<u16>() {
                Ok(number) => self.set_length(id, number),
                Err(_) => errors.push(PsfTagError::Number {
                    name: name.to_string(),
                }),
            }
        }
    }

    fn import_time_field(
        &mut self,
        id: TagId,
        name: &str,
        value: &str,
        errors: &mut Vec<PsfTagError>,
    ) {
        if value.is_empty() {
            self.remove(id);
        } else {
            match time_string_to_ticks(value) {
                Ok(ticks) => self.set_integer(id, ticks, 4),
                Err(_) => errors.push(PsfTagError::Time {
                    name: name.to_string(),
                }),
            }
        }
    }

    fn import_emulator(&mut self, value: &str, errors: &mut Vec<PsfTagError>) {
        if value.is_empty() {
            self.remove(TagId::Emulator);
        } else if let Ok(code) = value.parse::<u16>() {
            self.set_length(TagId::Emulator, code);
        } else {
            match EmulatorId::from_name(value) {
                EmulatorId::Unknown => errors.push(PsfTagError::Emulator),
                id => self.set_length(TagId::Emulator, u8::from(id) as u16),
            }
        }
    }

    fn import_volume(&mut self, value: &str, errors: &mut Vec<PsfTagError>) {
        if value.is_empty() {
            self.remove(TagId::Volume);
        } else {
            match value.parse::<f64>() {
                Ok(volume) if volume.is_finite() => {
                    self.set_integer(TagId::Volume, (volume * 65536.0) as u32, 4);
                }
                _ => errors.push(PsfTagError::Number {
                    name: "volume".to_string(),
                }),
            }
        }
    }

    fn import_track(&mut self, value: &str, errors: &mut Vec<PsfTagError>) {
        if value.is_empty() {
            self.remove(TagId::OstTrackNumber);
            return;
        }

        let digits = value.len() - value.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        if digits == 0 {
            errors.push(PsfTagError::Number {
                name: "track".to_string(),
            });
            return;
        }

        // trailing symbol char, e.g. "12a"; out-of-range tracks are dropped
        if let Ok(track) = value[..digits].parse::<u16>() {
            if track <= 255 {
                let symbol = value.as_bytes().get(digits).copied().unwrap_or(0);
                self.set_length(TagId::OstTrackNumber, (track << 8) | symbol as u16);
            }
        }
    }

    /// Renders the store as a PSF-style tag map.
    ///
    /// The `length` entry is the computed total playback length. With
    /// `unofficial_tags`, entries without an official PSF name
    /// (`created_at`, `soundtrack`, `intro`, ...) are included as well;
    /// otherwise those tags are left out.
    pub fn export_psf(&self, unofficial_tags: bool) -> BTreeMap<String, String> {
        let mut psf = BTreeMap::new();

        let length_ticks = self.playback_length();
        if length_ticks != 0 {
            psf.insert(
                "length".to_string(),
                ticks_to_time_string(length_ticks, false),
            );
        }

        for (id, value) in self.iter() {
            match id {
                TagId::SongName => {
                    psf.insert("title".to_string(), value.as_string());
                }
                TagId::ArtistName => {
                    psf.insert("artist".to_string(), value.as_string());
                }
                TagId::GameName => {
                    psf.insert("game".to_string(), value.as_string());
                }
                TagId::CopyrightYear => {
                    psf.insert("year".to_string(), value.as_integer().to_string());
                }
                TagId::Comment => {
                    psf.insert("comment".to_string(), value.as_string());
                }
                TagId::PublisherName => {
                    psf.insert("copyright".to_string(), value.as_string());
                }
                TagId::DumperName => {
                    psf.insert("snsfby".to_string(), value.as_string());
                }
                TagId::Volume => {
                    psf.insert("volume".to_string(), format_volume(value.as_integer()));
                }
                TagId::FadeLength => {
                    psf.insert(
                        "fade".to_string(),
                        ticks_to_time_string(value.as_integer(), false),
                    );
                }
                _ if unofficial_tags => match id {
                    TagId::DumpedDate => {
                        let date = DumpedDate::from_packed(value.as_integer());
                        psf.insert("created_at".to_string(), date.to_iso_string());
                    }
                    TagId::Emulator => {
                        psf.insert("emulator".to_string(), value.as_integer().to_string());
                    }
                    TagId::OstTitle => {
                        psf.insert("soundtrack".to_string(), value.as_string());
                    }
                    TagId::OstDisc => {
                        psf.insert("disc".to_string(), value.as_integer().to_string());
                    }
                    TagId::OstTrackNumber => {
                        let number = value.as_integer() as u16;
                        let track = number >> 8;
                        let mut entry = track.to_string();
                        let symbol = (number & 0xff) as u8;
                        if symbol != 0 {
                            entry.push(symbol as char);
                        }
                        psf.insert("track".to_string(), entry);
                    }
                    TagId::IntroLength => {
                        psf.insert(
                            "intro".to_string(),
                            ticks_to_time_string(value.as_integer(), false),
                        );
                    }
                    TagId::LoopLength => {
                        psf.insert(
                            "loop".to_string(),
                            ticks_to_time_string(value.as_integer(), false),
                        );
                    }
                    TagId::EndLength => {
                        psf.insert(
                            "end".to_string(),
                            ticks_to_time_string(value.as_integer(), false),
                        );
                    }
                    TagId::MutedVoices => {
                        psf.insert("mute".to_string(), value.as_integer().to_string());
                    }
                    TagId::LoopCount => {
                        psf.insert("loopcount".to_string(), value.as_integer().to_string());
                    }
                    _ => {}
                },
                _ => {}
            }
        }

        psf
    }
}

/// 16.16 fixed point to decimal, trailing zeros trimmed.
fn format_volume(fixed: u32) -> String {
    let mut out = format!("{:.6}", fixed as f64 / 65536.0);
    while out.ends_with('0') {
        out.pop();
    }
    if out.ends_with('.') {
        out.pop();
    }
    out
}
