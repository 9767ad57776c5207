use crate::{Error, TextureLoadError};
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Loads and releases the texture behind an [`AtlasPage`].
///
/// `load` must store the texture handle in `page.renderer_object`. Both calls are synchronous.
pub trait TextureLoader {
    type Texture;

    fn load(
        &mut self,
        page: &mut AtlasPage<Self::Texture>,
        path: &Path,
    ) -> Result<(), TextureLoadError>;

    fn unload(&mut self, texture: Self::Texture);
}

/// Loader that performs no I/O: the page "texture" is the resolved image path.
#[derive(Copy, Clone, Debug, Default)]
pub struct PathTextureLoader;

impl TextureLoader for PathTextureLoader {
    type Texture = PathBuf;

    fn load(&mut self, page: &mut AtlasPage<PathBuf>, path: &Path) -> Result<(), TextureLoadError> {
        page.renderer_object = Some(path.to_path_buf());
        Ok(())
    }

    fn unload(&mut self, _texture: PathBuf) {}
}

/// Pages and regions read from a packer-tool `.atlas` file.
///
/// Page textures are acquired through the loader while parsing and released by [`Atlas::dispose`]
/// (or on drop). Regions keep file order; duplicate names are allowed and lookups return the first.
pub struct Atlas<L: TextureLoader = PathTextureLoader> {
    pages: Vec<AtlasPage<L::Texture>>,
    regions: Vec<AtlasRegion>,
    loader: Option<L>,
}

impl<L: TextureLoader> Atlas<L> {
    /// Parses atlas text from `reader`, loading each page image from `images_dir` through `loader`.
    ///
    /// Any failure aborts the load; textures loaded before the failure are released again.
    pub fn load<R: BufRead>(reader: R, images_dir: &Path, loader: L) -> Result<Self, Error> {
        let mut atlas = Self {
            pages: Vec::new(),
            regions: Vec::new(),
            loader: Some(loader),
        };
        atlas.read(&mut LineReader::new(reader), images_dir)?;
        log::debug!(
            "parsed atlas: {} page(s), {} region(s)",
            atlas.pages.len(),
            atlas.regions.len()
        );
        Ok(atlas)
    }

    /// Opens and parses the atlas file at `path`. Page images resolve relative to its directory.
    pub fn from_path(path: impl AsRef<Path>, loader: L) -> Result<Self, Error> {
        let path = path.as_ref();
        let wrap = |source: Error| Error::AtlasFile {
            path: path.to_path_buf(),
            source: Box::new(source),
        };
        let file = File::open(path).map_err(|source| {
            wrap(Error::Io {
                path: path.to_path_buf(),
                source,
            })
        })?;
        let images_dir = path.parent().unwrap_or_else(|| Path::new(""));
        Self::load(BufReader::new(file), images_dir, loader).map_err(wrap)
    }

    /// Builds an atlas from already-resolved pages and regions. Disposing it releases nothing.
    pub fn from_parts(pages: Vec<AtlasPage<L::Texture>>, regions: Vec<AtlasRegion>) -> Self {
        Self {
            pages,
            regions,
            loader: None,
        }
    }

    pub fn pages(&self) -> &[AtlasPage<L::Texture>] {
        &self.pages
    }

    pub fn page(&self, index: usize) -> Option<&AtlasPage<L::Texture>> {
        self.pages.get(index)
    }

    pub fn regions(&self) -> &[AtlasRegion] {
        &self.regions
    }

    pub fn regions_mut(&mut self) -> &mut [AtlasRegion] {
        &mut self.regions
    }

    pub fn region_page(&self, region: &AtlasRegion) -> Option<&AtlasPage<L::Texture>> {
        self.pages.get(region.page)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AtlasRegion> {
        self.regions.iter()
    }

    /// Returns the first region with the given name.
    ///
    /// This is a linear scan; cache the result instead of calling it every frame.
    pub fn find_region(&self, name: &str) -> Option<&AtlasRegion> {
        self.regions.iter().find(|region| region.name == name)
    }

    pub fn find_region_index(&self, name: &str) -> Option<usize> {
        self.regions.iter().position(|region| region.name == name)
    }

    /// Mirrors every region's V coordinates (`v -> 1 - v`) for Y-up texture spaces.
    pub fn flip_v(&mut self) {
        for region in &mut self.regions {
            region.v = 1.0 - region.v;
            region.v2 = 1.0 - region.v2;
        }
    }

    /// Hands every page texture back to the loader. Later calls release nothing.
    pub fn dispose(&mut self) {
        let Some(mut loader) = self.loader.take() else {
            return;
        };
        for page in &mut self.pages {
            if let Some(texture) = page.renderer_object.take() {
                log::trace!("unloading atlas page texture {}", page.name);
                loader.unload(texture);
            }
        }
    }

    fn read<R: BufRead>(&mut self, reader: &mut LineReader<R>, images_dir: &Path) -> Result<(), Error> {
        let mut current_page: Option<usize> = None;
        while let Some(line) = reader.next_line()? {
            if line.trim().is_empty() {
                current_page = None;
                continue;
            }
            match current_page {
                None => {
                    let page = self.read_page(reader, images_dir, line)?;
                    self.pages.push(page);
                    current_page = Some(self.pages.len() - 1);
                }
                Some(page_index) => {
                    let region = read_region(reader, &self.pages[page_index], page_index, line)?;
                    self.regions.push(region);
                }
            }
        }
        Ok(())
    }

    fn read_page<R: BufRead>(
        &mut self,
        reader: &mut LineReader<R>,
        images_dir: &Path,
        name: String,
    ) -> Result<AtlasPage<L::Texture>, Error> {
        let mut page = AtlasPage::new(name);

        let (mut line, mut tuple) = reader.read_tuple()?;
        if let Tuple::Pair(width, height) = tuple {
            page.width = parse_number(&width, line)?;
            page.height = parse_number(&height, line)?;
            (line, tuple) = reader.read_tuple()?;
        } else {
            log::warn!(
                "atlas page '{}' has no size line; region UVs will not be normalized",
                page.name
            );
        }

        let format = tuple.single(line)?;
        page.format = Format::from_token(&format).ok_or_else(|| Error::AtlasUnknownValue {
            line,
            kind: "format",
            value: format.clone(),
        })?;

        let (line, tuple) = reader.read_tuple()?;
        let (min, mag) = tuple.pair(line)?;
        page.min_filter = parse_filter(&min, line)?;
        page.mag_filter = parse_filter(&mag, line)?;

        let (u_wrap, v_wrap) = read_wrap(reader)?;
        page.u_wrap = u_wrap;
        page.v_wrap = v_wrap;

        let path = images_dir.join(&page.name);
        if let Some(loader) = self.loader.as_mut() {
            log::trace!("loading atlas page texture {}", path.display());
            loader
                .load(&mut page, &path)
                .map_err(|source| Error::TextureLoad { path, source })?;
        }
        Ok(page)
    }
}

impl Atlas<PathTextureLoader> {
    /// Parses atlas text whose page textures are recorded as bare page file names.
    pub fn parse(input: &str) -> Result<Self, Error> {
        Self::load(input.as_bytes(), Path::new(""), PathTextureLoader)
    }
}

impl FromStr for Atlas<PathTextureLoader> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<L: TextureLoader> Drop for Atlas<L> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<L: TextureLoader> fmt::Debug for Atlas<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Atlas")
            .field("pages", &self.pages.iter().map(|p| &p.name).collect::<Vec<_>>())
            .field("regions", &self.regions.len())
            .field("loaded", &self.loader.is_some())
            .finish()
    }
}

impl<'a, L: TextureLoader> IntoIterator for &'a Atlas<L> {
    type Item = &'a AtlasRegion;
    type IntoIter = std::slice::Iter<'a, AtlasRegion>;

    fn into_iter(self) -> Self::IntoIter {
        self.regions.iter()
    }
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct AtlasPage<T> {
    pub name: String,
    pub format: Format,
    pub min_filter: TextureFilter,
    pub mag_filter: TextureFilter,
    pub u_wrap: TextureWrap,
    pub v_wrap: TextureWrap,
    pub width: u32,
    pub height: u32,
    /// Texture handle set by the loader. Owned by the loader's resource system.
    #[cfg_attr(feature = "json", serde(skip))]
    pub renderer_object: Option<T>,
}

impl<T> AtlasPage<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            format: Format::default(),
            min_filter: TextureFilter::default(),
            mag_filter: TextureFilter::default(),
            u_wrap: TextureWrap::default(),
            v_wrap: TextureWrap::default(),
            width: 0,
            height: 0,
            renderer_object: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct AtlasRegion {
    pub name: String,
    /// Index into [`Atlas::pages`].
    pub page: usize,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub u: f32,
    pub v: f32,
    pub u2: f32,
    pub v2: f32,
    pub offset_x: i32,
    pub offset_y: i32,
    pub original_width: i32,
    pub original_height: i32,
    /// Packing index; `-1` when the region is not part of a numbered sequence.
    pub index: i32,
    pub rotate: bool,
    pub degrees: i32,
    /// Nine-patch split lines: left, right, top, bottom.
    pub splits: Option<[i32; 4]>,
    /// Nine-patch content padding; only present together with `splits`.
    pub pads: Option<[i32; 4]>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub enum Format {
    Alpha,
    Intensity,
    LuminanceAlpha,
    RGB565,
    RGBA4444,
    RGB888,
    #[default]
    RGBA8888,
}

impl Format {
    const ALL: [Self; 7] = [
        Self::Alpha,
        Self::Intensity,
        Self::LuminanceAlpha,
        Self::RGB565,
        Self::RGBA4444,
        Self::RGB888,
        Self::RGBA8888,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Alpha => "Alpha",
            Self::Intensity => "Intensity",
            Self::LuminanceAlpha => "LuminanceAlpha",
            Self::RGB565 => "RGB565",
            Self::RGBA4444 => "RGBA4444",
            Self::RGB888 => "RGB888",
            Self::RGBA8888 => "RGBA8888",
        }
    }

    /// Case-sensitive lookup of an atlas format token.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|format| format.as_str() == token)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub enum TextureFilter {
    #[default]
    Nearest,
    Linear,
    MipMap,
    MipMapNearestNearest,
    MipMapLinearNearest,
    MipMapNearestLinear,
    MipMapLinearLinear,
}

impl TextureFilter {
    const ALL: [Self; 7] = [
        Self::Nearest,
        Self::Linear,
        Self::MipMap,
        Self::MipMapNearestNearest,
        Self::MipMapLinearNearest,
        Self::MipMapNearestLinear,
        Self::MipMapLinearLinear,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Nearest => "Nearest",
            Self::Linear => "Linear",
            Self::MipMap => "MipMap",
            Self::MipMapNearestNearest => "MipMapNearestNearest",
            Self::MipMapLinearNearest => "MipMapLinearNearest",
            Self::MipMapNearestLinear => "MipMapNearestLinear",
            Self::MipMapLinearLinear => "MipMapLinearLinear",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|filter| filter.as_str() == token)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub enum TextureWrap {
    MirroredRepeat,
    #[default]
    ClampToEdge,
    Repeat,
}

fn parse_filter(value: &str, line: usize) -> Result<TextureFilter, Error> {
    TextureFilter::from_token(value).ok_or_else(|| Error::AtlasUnknownValue {
        line,
        kind: "texture filter",
        value: value.to_string(),
    })
}

fn parse_wrap(value: &str) -> (TextureWrap, TextureWrap) {
    match value {
        "x" => (TextureWrap::Repeat, TextureWrap::ClampToEdge),
        "y" => (TextureWrap::ClampToEdge, TextureWrap::Repeat),
        "xy" => (TextureWrap::Repeat, TextureWrap::Repeat),
        _ => (TextureWrap::ClampToEdge, TextureWrap::ClampToEdge),
    }
}

const WRAP_TOKENS: [&str; 4] = ["x", "y", "xy", "none"];

/// The repeat line may be missing entirely. Only a line whose value is a wrap token counts as
/// the repeat line; anything else (eg. a region named `hero:idle`) is left unread.
fn read_wrap<R: BufRead>(reader: &mut LineReader<R>) -> Result<(TextureWrap, TextureWrap), Error> {
    let Some(content) = reader.next_line()? else {
        return Ok(parse_wrap(""));
    };
    let token = content.split_once(':').map(|(_, value)| value.trim());
    match token {
        Some(token) if WRAP_TOKENS.contains(&token) => Ok(parse_wrap(token)),
        _ => {
            reader.push_back(content);
            Ok(parse_wrap(""))
        }
    }
}

fn parse_degrees(value: &str, line: usize) -> Result<i32, Error> {
    match value {
        "true" => Ok(90),
        "false" => Ok(0),
        other => parse_number(other, line),
    }
}

fn read_region<R: BufRead, T>(
    reader: &mut LineReader<R>,
    page: &AtlasPage<T>,
    page_index: usize,
    name: String,
) -> Result<AtlasRegion, Error> {
    let line = reader.line() + 1;
    let degrees = parse_degrees(&reader.read_value()?, line)?;
    let rotate = degrees == 90;

    let (x, y) = reader.read_pair::<i32>()?;
    let (width, height) = reader.read_pair::<i32>()?;

    // Edges are summed in i64; packer coordinates near i32::MAX must not overflow.
    let (x_edge, y_edge) = (i64::from(x), i64::from(y));
    let (width_span, height_span) = (i64::from(width), i64::from(height));
    let page_width = page.width as f32;
    let page_height = page.height as f32;
    let u = x as f32 / page_width;
    let v = y as f32 / page_height;
    let (u2, v2) = if rotate {
        (
            (x_edge + height_span) as f32 / page_width,
            (y_edge + width_span) as f32 / page_height,
        )
    } else {
        (
            (x_edge + width_span) as f32 / page_width,
            (y_edge + height_span) as f32 / page_height,
        )
    };

    let mut splits = None;
    let mut pads = None;
    let (mut line, mut tuple) = reader.read_tuple()?;
    if let Tuple::Quad(values) = tuple {
        splits = Some(parse_quad(&values, line)?);
        (line, tuple) = reader.read_tuple()?;
        if let Tuple::Quad(values) = tuple {
            pads = Some(parse_quad(&values, line)?);
            (line, tuple) = reader.read_tuple()?;
        }
    }
    let (original_width, original_height) = tuple.pair(line)?;
    let original_width = parse_number(&original_width, line)?;
    let original_height = parse_number(&original_height, line)?;

    let (offset_x, offset_y) = reader.read_pair::<i32>()?;
    let line = reader.line() + 1;
    let index = parse_number(&reader.read_value()?, line)?;

    Ok(AtlasRegion {
        name,
        page: page_index,
        x,
        y,
        width: width.unsigned_abs(),
        height: height.unsigned_abs(),
        u,
        v,
        u2,
        v2,
        offset_x,
        offset_y,
        original_width,
        original_height,
        index,
        rotate,
        degrees,
        splits,
        pads,
    })
}

/// Values of one `label: value[, value]*` line. The arity drives the optional-field grammar.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Tuple {
    Single(String),
    Pair(String, String),
    Quad([String; 4]),
}

impl Tuple {
    /// Splits the text after the first `:` into at most four comma-separated values.
    pub(crate) fn parse(content: &str, line: usize) -> Result<Self, Error> {
        let value = label_value(content, line)?;
        let mut values: Vec<String> = value
            .splitn(4, ',')
            .map(|part| part.trim().to_string())
            .collect();
        match values.len() {
            1 => Ok(Self::Single(values.remove(0))),
            2 => {
                let b = values.remove(1);
                let a = values.remove(0);
                Ok(Self::Pair(a, b))
            }
            4 => values
                .try_into()
                .map(Self::Quad)
                .map_err(|values: Vec<String>| Error::AtlasTupleArity {
                    line,
                    expected: "1, 2 or 4",
                    found: values.len(),
                }),
            found => Err(Error::AtlasTupleArity {
                line,
                expected: "1, 2 or 4",
                found,
            }),
        }
    }

    pub(crate) fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Pair(..) => 2,
            Self::Quad(_) => 4,
        }
    }

    pub(crate) fn single(self, line: usize) -> Result<String, Error> {
        match self {
            Self::Single(value) => Ok(value),
            other => Err(Error::AtlasTupleArity {
                line,
                expected: "1",
                found: other.len(),
            }),
        }
    }

    pub(crate) fn pair(self, line: usize) -> Result<(String, String), Error> {
        match self {
            Self::Pair(a, b) => Ok((a, b)),
            other => Err(Error::AtlasTupleArity {
                line,
                expected: "2",
                found: other.len(),
            }),
        }
    }
}

fn label_value(content: &str, line: usize) -> Result<&str, Error> {
    content
        .split_once(':')
        .map(|(_, value)| value.trim())
        .ok_or_else(|| Error::AtlasInvalidLine {
            line,
            content: content.to_string(),
        })
}

fn parse_number<T: FromStr>(value: &str, line: usize) -> Result<T, Error> {
    value.parse().map_err(|_| Error::AtlasInvalidNumber {
        line,
        value: value.to_string(),
    })
}

fn parse_quad(values: &[String; 4], line: usize) -> Result<[i32; 4], Error> {
    Ok([
        parse_number(&values[0], line)?,
        parse_number(&values[1], line)?,
        parse_number(&values[2], line)?,
        parse_number(&values[3], line)?,
    ])
}

struct LineReader<R> {
    inner: R,
    line: usize,
    pending: Option<String>,
}

impl<R: BufRead> LineReader<R> {
    fn new(inner: R) -> Self {
        Self {
            inner,
            line: 0,
            pending: None,
        }
    }

    /// Number of the last line read (1-based).
    fn line(&self) -> usize {
        self.line
    }

    fn next_line(&mut self) -> Result<Option<String>, Error> {
        if let Some(content) = self.pending.take() {
            self.line += 1;
            return Ok(Some(content));
        }
        let mut buf = String::new();
        let read = self
            .inner
            .read_line(&mut buf)
            .map_err(|source| Error::AtlasRead {
                line: self.line + 1,
                source,
            })?;
        if read == 0 {
            return Ok(None);
        }
        self.line += 1;
        if buf.ends_with('\n') {
            buf.pop();
            if buf.ends_with('\r') {
                buf.pop();
            }
        }
        Ok(Some(buf))
    }

    /// Returns `content` (the line just read) so the next `next_line` yields it again.
    fn push_back(&mut self, content: String) {
        self.line -= 1;
        self.pending = Some(content);
    }

    fn expect_line(&mut self) -> Result<String, Error> {
        self.next_line()?
            .ok_or(Error::AtlasUnexpectedEof { line: self.line })
    }

    fn read_value(&mut self) -> Result<String, Error> {
        let content = self.expect_line()?;
        label_value(&content, self.line).map(str::to_string)
    }

    fn read_tuple(&mut self) -> Result<(usize, Tuple), Error> {
        let content = self.expect_line()?;
        Ok((self.line, Tuple::parse(&content, self.line)?))
    }

    fn read_pair<T: FromStr>(&mut self) -> Result<(T, T), Error> {
        let (line, tuple) = self.read_tuple()?;
        let (a, b) = tuple.pair(line)?;
        Ok((parse_number(&a, line)?, parse_number(&b, line)?))
    }
}
