//! The closed atom vocabulary of pdfsed scripts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest atom accepted by the lexer, in bytes.
pub const MAX_ATOM_LEN: usize = 31;

/// A classified script atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Atom {
    /// `;` or end of stream
    EndOfCommand,

    /// `set`
    CmdSet,
    /// `create`
    CmdCreate,
    /// `draw`
    CmdDraw,

    /// `title`
    ObjTitle,
    /// `author`, and also `creator`
    ObjAuthor,
    /// Never produced: the classifier folds `creator` into [`Atom::ObjAuthor`].
    ObjCreator,
    /// `page`
    ObjPage,
    /// `text`
    ObjText,
    /// `image`
    ObjImage,

    /// `size`
    PropSize,
    /// `angle`
    PropAngle,
    /// `pos`
    PropPos,
    /// `dpi`
    PropDpi,
    /// `scale`
    PropScale,
    /// `mask`
    PropMask,
    /// `mask-image`
    PropMaskImage,

    /// Anything outside the vocabulary
    Unknown,
}

impl Atom {
    /// Classify the text of a bare atom. Matching is case-sensitive.
    pub fn classify(text: &str) -> Atom {
        match text {
            ";" => Atom::EndOfCommand,
            "set" => Atom::CmdSet,
            "create" => Atom::CmdCreate,
            "draw" => Atom::CmdDraw,
            "title" => Atom::ObjTitle,
            "author" | "creator" => Atom::ObjAuthor,
            "page" => Atom::ObjPage,
            "text" => Atom::ObjText,
            "image" => Atom::ObjImage,
            "size" => Atom::PropSize,
            "angle" => Atom::PropAngle,
            "pos" => Atom::PropPos,
            "dpi" => Atom::PropDpi,
            "scale" => Atom::PropScale,
            "mask" => Atom::PropMask,
            "mask-image" => Atom::PropMaskImage,
            _ => Atom::Unknown,
        }
    }

    /// Script spelling of the atom.
    pub fn as_str(&self) -> &'static str {
        match self {
            Atom::EndOfCommand => ";",
            Atom::CmdSet => "set",
            Atom::CmdCreate => "create",
            Atom::CmdDraw => "draw",
            Atom::ObjTitle => "title",
            Atom::ObjAuthor => "author",
            Atom::ObjCreator => "creator",
            Atom::ObjPage => "page",
            Atom::ObjText => "text",
            Atom::ObjImage => "image",
            Atom::PropSize => "size",
            Atom::PropAngle => "angle",
            Atom::PropPos => "pos",
            Atom::PropDpi => "dpi",
            Atom::PropScale => "scale",
            Atom::PropMask => "mask",
            Atom::PropMaskImage => "mask-image",
            Atom::Unknown => "<unknown>",
        }
    }

    pub fn is_command(&self) -> bool {
        matches!(self, Atom::CmdSet | Atom::CmdCreate | Atom::CmdDraw)
    }

    pub fn is_object(&self) -> bool {
        matches!(
            self,
            Atom::ObjTitle
                | Atom::ObjAuthor
                | Atom::ObjCreator
                | Atom::ObjPage
                | Atom::ObjText
                | Atom::ObjImage
        )
    }

    pub fn is_property(&self) -> bool {
        matches!(
            self,
            Atom::PropSize
                | Atom::PropAngle
                | Atom::PropPos
                | Atom::PropDpi
                | Atom::PropScale
                | Atom::PropMask
                | Atom::PropMaskImage
        )
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_vocabulary() {
        for atom in [
            Atom::CmdSet,
            Atom::CmdCreate,
            Atom::CmdDraw,
            Atom::ObjTitle,
            Atom::ObjAuthor,
            Atom::ObjPage,
            Atom::ObjText,
            Atom::ObjImage,
            Atom::PropSize,
            Atom::PropAngle,
            Atom::PropPos,
            Atom::PropDpi,
            Atom::PropScale,
            Atom::PropMask,
            Atom::PropMaskImage,
        ] {
            assert_eq!(Atom::classify(atom.as_str()), atom);
        }
    }

    #[test]
    fn test_creator_is_author() {
        assert_eq!(Atom::classify("creator"), Atom::ObjAuthor);
    }

    #[test]
    fn test_classify_is_case_sensitive() {
        assert_eq!(Atom::classify("Set"), Atom::Unknown);
        assert_eq!(Atom::classify("DPI"), Atom::Unknown);
        assert_eq!(Atom::classify("mask_image"), Atom::Unknown);
    }

    #[test]
    fn test_groups() {
        assert!(Atom::CmdDraw.is_command());
        assert!(!Atom::CmdDraw.is_object());
        assert!(Atom::ObjImage.is_object());
        assert!(Atom::PropMaskImage.is_property());
        assert!(!Atom::Unknown.is_property());
        assert_eq!(Atom::PropMaskImage.to_string(), "mask-image");
    }
}
