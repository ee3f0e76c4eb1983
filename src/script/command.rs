//! Typed pdfsed commands and the reader that produces them.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::detect::{detect_format_from_path, TextFormat};
use crate::error::{Error, Result};
use crate::parser::ErrorMode;

use super::atom::Atom;
use super::lexer::ScriptLexer;

/// Document information fields settable with `set`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InfoField {
    Title,
    Author,
    /// Never produced by [`ScriptReader`]: `set creator` is read as [`InfoField::Author`].
    Creator,
}

impl InfoField {
    fn from_atom(atom: Atom) -> Option<InfoField> {
        match atom {
            Atom::ObjTitle => Some(InfoField::Title),
            Atom::ObjAuthor => Some(InfoField::Author),
            Atom::ObjCreator => Some(InfoField::Creator),
            _ => None,
        }
    }
}

/// `create page [size W H] [angle A] ;`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSpec {
    /// Page size in points; `None` keeps the previous page's size.
    pub size: Option<(f32, f32)>,
    /// Rotation in degrees.
    pub angle: f32,
}

/// `draw image "file" [dpi D] [pos X Y] [mask 0xRRGGBB] [mask-image "file"] ;`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSpec {
    pub path: PathBuf,
    /// Resolution; `None` fits the image to the page width.
    pub dpi: Option<f32>,
    /// Offset from the lower left corner, in points.
    pub pos: (f32, f32),
    /// Colour key to make transparent.
    pub mask: Option<u32>,
    /// Soft mask image.
    pub mask_image: Option<PathBuf>,
}

impl ImageSpec {
    /// Split the colour mask into red, green and blue.
    pub fn mask_rgb(&self) -> Option<(u8, u8, u8)> {
        self.mask.map(|m| {
            (
                ((m >> 16) & 0xff) as u8,
                ((m >> 8) & 0xff) as u8,
                (m & 0xff) as u8,
            )
        })
    }
}

/// `draw text "file" [dpi D] [pos X Y] [scale S] ;`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSpec {
    pub path: PathBuf,
    /// Resolution; `None` fits the layout's page box to the page width.
    pub dpi: Option<f32>,
    pub pos: (f32, f32),
    pub scale: f32,
}

impl TextSpec {
    /// Format of the hidden-text file, from its extension.
    pub fn layout_format(&self) -> Result<TextFormat> {
        detect_format_from_path(&self.path)
    }
}

/// One script command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    SetInfo { fields: Vec<(InfoField, String)> },
    CreatePage(PageSpec),
    DrawImage(ImageSpec),
    DrawText(TextSpec),
}

impl Command {
    /// Script keyword pair naming the command, such as `draw image`.
    pub fn name(&self) -> &'static str {
        match self {
            Command::SetInfo { .. } => "set",
            Command::CreatePage(_) => "create page",
            Command::DrawImage(_) => "draw image",
            Command::DrawText(_) => "draw text",
        }
    }
}

/// Options for reading scripts.
#[derive(Debug, Clone, Default)]
pub struct ScriptOptions {
    /// Strict rejects unknown commands; Lenient skips them.
    pub error_mode: ErrorMode,
    /// Directory relative file names are resolved against.
    pub base_dir: Option<PathBuf>,
}

impl ScriptOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    pub fn lenient(self) -> Self {
        self.with_error_mode(ErrorMode::Lenient)
    }

    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }
}

/// Reads [`Command`]s from a pdfsed script.
pub struct ScriptReader<R> {
    lexer: ScriptLexer<R>,
    options: ScriptOptions,
}

impl<R: BufRead> ScriptReader<R> {
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, ScriptOptions::default())
    }

    pub fn with_options(reader: R, options: ScriptOptions) -> Self {
        Self {
            lexer: ScriptLexer::new(reader),
            options,
        }
    }

    /// Read the next command, or `None` at the end of the script.
    ///
    /// Empty commands (a lone `;`) are skipped.
    pub fn next_command(&mut self) -> Result<Option<Command>> {
        loop {
            let atom = self.lexer.read_atom()?;
            let command = match atom {
                Atom::EndOfCommand if self.lexer.is_exhausted() => return Ok(None),
                Atom::EndOfCommand => continue,
                Atom::CmdSet => self.read_set()?,
                Atom::CmdCreate => self.read_create()?,
                Atom::CmdDraw => self.read_draw()?,
                other => {
                    let found = if other == Atom::Unknown {
                        self.lexer.last_atom().to_string()
                    } else {
                        other.to_string()
                    };
                    if self.options.error_mode == ErrorMode::Strict {
                        return Err(match other {
                            Atom::Unknown => Error::UnknownAtom(found),
                            _ => Error::UnexpectedAtom {
                                expected: "command",
                                found: other,
                            },
                        });
                    }
                    log::warn!("Skipping unknown pdfsed command '{}'", found);
                    self.lexer.skip_command()?;
                    continue;
                }
            };
            log::debug!("Read pdfsed command: {}", command.name());
            return Ok(Some(command));
        }
    }

    /// Read every remaining command.
    pub fn read_all(&mut self) -> Result<Vec<Command>> {
        let mut commands = Vec::new();
        while let Some(command) = self.next_command()? {
            commands.push(command);
        }
        Ok(commands)
    }

    fn read_set(&mut self) -> Result<Command> {
        let mut fields = Vec::new();
        loop {
            let atom = self.lexer.read_atom()?;
            if atom == Atom::EndOfCommand {
                break;
            }
            let field = InfoField::from_atom(atom).ok_or_else(|| {
                self.unexpected(atom, "title, author or creator")
            })?;
            let value = self.lexer.read_str()?;
            fields.push((field, value));
        }
        Ok(Command::SetInfo { fields })
    }

    fn read_create(&mut self) -> Result<Command> {
        let object = self.lexer.read_atom()?;
        if object != Atom::ObjPage {
            return Err(self.unexpected(object, "page"));
        }

        let mut page = PageSpec {
            size: None,
            angle: 0.0,
        };
        loop {
            match self.lexer.read_atom()? {
                Atom::EndOfCommand => break,
                Atom::PropSize => {
                    let w = self.lexer.read_float()?;
                    let h = self.lexer.read_float()?;
                    if w <= 0.0 || h <= 0.0 {
                        return Err(Error::malformed(format!(
                            "page size must be positive, got {} x {}",
                            w, h
                        )));
                    }
                    page.size = Some((w, h));
                }
                Atom::PropAngle => page.angle = self.lexer.read_float()?,
                other => return Err(self.unexpected(other, "size or angle")),
            }
        }
        Ok(Command::CreatePage(page))
    }

    fn read_draw(&mut self) -> Result<Command> {
        match self.lexer.read_atom()? {
            Atom::ObjImage => self.read_image(),
            Atom::ObjText => self.read_text(),
            other => Err(self.unexpected(other, "image or text")),
        }
    }

    fn read_image(&mut self) -> Result<Command> {
        let mut image = ImageSpec {
            path: self.read_path()?,
            dpi: None,
            pos: (0.0, 0.0),
            mask: None,
            mask_image: None,
        };
        loop {
            match self.lexer.read_atom()? {
                Atom::EndOfCommand => break,
                Atom::PropDpi => image.dpi = Some(self.lexer.read_float()?),
                Atom::PropPos => image.pos = self.read_pair()?,
                Atom::PropMask => image.mask = Some(self.lexer.read_color()?),
                Atom::PropMaskImage => image.mask_image = Some(self.read_path()?),
                other => return Err(self.unexpected(other, "dpi, pos, mask or mask-image")),
            }
        }
        Ok(Command::DrawImage(image))
    }

    fn read_text(&mut self) -> Result<Command> {
        let mut text = TextSpec {
            path: self.read_path()?,
            dpi: None,
            pos: (0.0, 0.0),
            scale: 1.0,
        };
        loop {
            match self.lexer.read_atom()? {
                Atom::EndOfCommand => break,
                Atom::PropDpi => text.dpi = Some(self.lexer.read_float()?),
                Atom::PropPos => text.pos = self.read_pair()?,
                Atom::PropScale => text.scale = self.lexer.read_float()?,
                other => return Err(self.unexpected(other, "dpi, pos or scale")),
            }
        }
        Ok(Command::DrawText(text))
    }

    fn read_pair(&mut self) -> Result<(f32, f32)> {
        let x = self.lexer.read_float()?;
        let y = self.lexer.read_float()?;
        Ok((x, y))
    }

    fn read_path(&mut self) -> Result<PathBuf> {
        let name = self.lexer.read_str()?;
        Ok(resolve(self.options.base_dir.as_deref(), &name))
    }

    fn unexpected(&self, found: Atom, expected: &'static str) -> Error {
        match found {
            Atom::Unknown => Error::UnknownAtom(self.lexer.last_atom().to_string()),
            _ => Error::UnexpectedAtom { expected, found },
        }
    }
}

fn resolve(base: Option<&Path>, name: &str) -> PathBuf {
    let path = PathBuf::from(name);
    match base {
        Some(dir) if path.is_relative() => dir.join(path),
        _ => path,
    }
}

/// Read every command of a script.
pub fn read_script<R: BufRead>(reader: R, options: ScriptOptions) -> Result<Vec<Command>> {
    ScriptReader::with_options(reader, options).read_all()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(input: &str) -> Result<Vec<Command>> {
        read_script(input.as_bytes(), ScriptOptions::default())
    }

    #[test]
    fn test_set_info() {
        let commands = read("set title \"Scan\" author \"A\" creator \"B\" ;").unwrap();
        assert_eq!(
            commands,
            vec![Command::SetInfo {
                fields: vec![
                    (InfoField::Title, "Scan".to_string()),
                    (InfoField::Author, "A".to_string()),
                    (InfoField::Author, "B".to_string()),
                ]
            }]
        );
    }

    #[test]
    fn test_create_page() {
        let commands = read("create page size 595 842 angle 90 ;\ncreate page;").unwrap();
        assert_eq!(
            commands,
            vec![
                Command::CreatePage(PageSpec {
                    size: Some((595.0, 842.0)),
                    angle: 90.0
                }),
                Command::CreatePage(PageSpec {
                    size: None,
                    angle: 0.0
                }),
            ]
        );
    }

    #[test]
    fn test_create_requires_page() {
        assert!(matches!(
            read("create image ;"),
            Err(Error::UnexpectedAtom {
                expected: "page",
                found: Atom::ObjImage
            })
        ));
    }

    #[test]
    fn test_page_size_must_be_positive() {
        assert!(matches!(
            read("create page size 0 10 ;"),
            Err(Error::MalformedToken(_))
        ));
    }

    #[test]
    fn test_draw_image() {
        let options = ScriptOptions::new().with_base_dir("/scans");
        let commands = read_script(
            "draw image \"p1.png\" dpi 300 pos 10 20 mask 0xff8000 mask-image \"/abs/m.png\" ;"
                .as_bytes(),
            options,
        )
        .unwrap();
        let Command::DrawImage(image) = &commands[0] else {
            panic!("expected draw image, got {:?}", commands[0]);
        };
        assert_eq!(image.path, PathBuf::from("/scans/p1.png"));
        assert_eq!(image.dpi, Some(300.0));
        assert_eq!(image.pos, (10.0, 20.0));
        assert_eq!(image.mask_rgb(), Some((0xff, 0x80, 0x00)));
        assert_eq!(image.mask_image, Some(PathBuf::from("/abs/m.png")));
    }

    #[test]
    fn test_draw_text() {
        let commands = read("draw text \"p1.djvused\" scale 0.5 ;").unwrap();
        let Command::DrawText(text) = &commands[0] else {
            panic!("expected draw text, got {:?}", commands[0]);
        };
        assert_eq!(text.path, PathBuf::from("p1.djvused"));
        assert_eq!(text.dpi, None);
        assert_eq!(text.scale, 0.5);
        assert_eq!(text.layout_format().unwrap(), TextFormat::Djvused);
    }

    #[test]
    fn test_property_not_allowed() {
        assert!(matches!(
            read("draw text \"a.djvused\" mask 0xffffff ;"),
            Err(Error::UnexpectedAtom {
                found: Atom::PropMask,
                ..
            })
        ));
    }

    #[test]
    fn test_unknown_command_strict() {
        match read("explode \"x\" ;") {
            Err(Error::UnknownAtom(atom)) => assert_eq!(atom, "explode"),
            other => panic!("expected unknown atom, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_command_lenient() {
        let commands = read_script(
            "explode \"x ; y\" 3 ;\ncreate page size 1 1 ;".as_bytes(),
            ScriptOptions::new().lenient(),
        )
        .unwrap();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].name(), "create page");
    }

    #[test]
    fn test_empty_commands_and_eof() {
        let commands = read(" ; ;\n create page size 1 1").unwrap();
        assert_eq!(commands.len(), 1);
        assert!(read("").unwrap().is_empty());
    }

    #[test]
    fn test_unterminated_string() {
        assert!(matches!(
            read("set title \"no end"),
            Err(Error::StreamExhausted)
        ));
    }
}
