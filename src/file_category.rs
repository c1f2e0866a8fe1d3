/// File categorization by extension.
///
/// This module maps file extensions to a fixed, ordered set of categories
/// (e.g. "Images", "Documents", "Archives"). The lookup table is built once
/// per process from a grouped declaration and never mutated afterwards.
///
/// # Examples
///
/// ```
/// use dirsort::file_category::{Category, categorize};
/// use std::path::Path;
///
/// assert_eq!(categorize(Path::new("photo.JPG")), Category::Images);
/// assert_eq!(categorize(Path::new("backup.tar.gz")), Category::Archives);
/// assert_eq!(categorize(Path::new(".gitignore")), Category::Others);
/// ```
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// A broad file category.
///
/// The declaration order is the reporting order; `Others` is always last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Image files (PNG, JPG, GIF, etc.)
    Images,
    /// Document files (PDF, DOCX, TXT, etc.)
    Documents,
    /// Video files (MP4, MKV, AVI, etc.)
    Videos,
    /// Audio files (MP3, WAV, FLAC, etc.)
    Audio,
    /// Archive files (ZIP, RAR, TAR, etc.)
    Archives,
    /// Source code and scripts
    Code,
    /// E-book formats (EPUB, MOBI, etc.)
    EBooks,
    /// Anything with an unknown or missing extension
    Others,
}

impl Category {
    /// Every category, in reporting order.
    pub const ALL: [Category; 8] = [
        Category::Images,
        Category::Documents,
        Category::Videos,
        Category::Audio,
        Category::Archives,
        Category::Code,
        Category::EBooks,
        Category::Others,
    ];

    /// Returns the directory name for this category.
    ///
    /// # Examples
    ///
    /// ```
    /// use dirsort::file_category::Category;
    ///
    /// assert_eq!(Category::Images.dir_name(), "Images");
    /// assert_eq!(Category::EBooks.dir_name(), "eBooks");
    /// assert_eq!(Category::Others.dir_name(), "Others");
    /// ```
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Images => "Images",
            Category::Documents => "Documents",
            Category::Videos => "Videos",
            Category::Audio => "Audio",
            Category::Archives => "Archives",
            Category::Code => "Code",
            Category::EBooks => "eBooks",
            Category::Others => "Others",
        }
    }

    /// Position of this category in [`Category::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Grouped extension declaration. Flattened in order, so an extension listed
/// in two groups ends up in the later one.
const EXTENSION_GROUPS: &[(Category, &[&str])] = &[
    (
        Category::Images,
        &[
            "jpg", "jpeg", "png", "gif", "bmp", "tiff", "tif", "webp", "svg", "heic", "heif", "ico",
        ],
    ),
    (
        Category::Documents,
        &[
            "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "txt", "md", "rtf", "csv", "tsv",
            "json", "xml", "yaml", "yml", "ipynb", "tex",
        ],
    ),
    (
        Category::Videos,
        &[
            "mp4", "mkv", "mov", "avi", "wmv", "flv", "webm", "m4v", "3gp", "mpeg", "mpg", "ts",
            "m2ts", "ogv",
        ],
    ),
    (
        Category::Audio,
        &[
            "mp3", "wav", "flac", "aac", "m4a", "ogg", "opus", "wma", "aiff", "aif", "mid", "midi",
            "amr", "caf",
        ],
    ),
    (
        Category::Archives,
        &[
            "zip", "rar", "7z", "tar", "gz", "bz2", "xz", "zst", "lz", "lzma", "tgz", "tbz2", "txz",
        ],
    ),
    (
        Category::Code,
        &[
            "py", "js", "ts", "jsx", "tsx", "html", "css", "c", "h", "cpp", "hpp", "cc", "cs",
            "java", "kt", "go", "rs", "rb", "php", "r", "jl", "m", "sh", "bash", "zsh", "ps1",
            "bat", "pl", "lua", "sql", "v", "sv", "vhd", "vhdl",
        ],
    ),
    (
        Category::EBooks,
        &["epub", "mobi", "azw", "azw3", "djvu", "fb2"],
    ),
];

static GLOBAL_MAPPER: Lazy<FileMapper> = Lazy::new(FileMapper::new);

/// Maps file extensions to categories.
///
/// Lookups are case-insensitive on the extension and O(1).
#[derive(Debug, Clone)]
pub struct FileMapper {
    extension_map: HashMap<&'static str, Category>,
}

impl FileMapper {
    /// Builds a mapper from the standard extension groups.
    pub fn new() -> Self {
        let extension_map = EXTENSION_GROUPS
            .iter()
            .flat_map(|(category, exts)| exts.iter().map(move |ext| (*ext, *category)))
            .collect();
        Self { extension_map }
    }

    /// The process-wide mapper, built on first use.
    pub fn global() -> &'static FileMapper {
        &GLOBAL_MAPPER
    }

    /// Maps a bare extension (no leading dot) to a category.
    ///
    /// # Examples
    ///
    /// ```
    /// use dirsort::file_category::{Category, FileMapper};
    ///
    /// let mapper = FileMapper::global();
    /// assert_eq!(mapper.extension_to_category("PDF"), Some(Category::Documents));
    /// assert_eq!(mapper.extension_to_category("xyz"), None);
    /// ```
    pub fn extension_to_category(&self, ext: &str) -> Option<Category> {
        self.extension_map.get(ext.to_lowercase().as_str()).copied()
    }

    /// Determines the category of a file from the last suffix of its name.
    ///
    /// Names without a suffix, including dotfiles such as `.gitignore`,
    /// fall back to [`Category::Others`].
    pub fn categorize(&self, path: &Path) -> Category {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| self.extension_to_category(ext))
            .unwrap_or(Category::Others)
    }

    /// Number of distinct extensions known to this mapper.
    pub fn len(&self) -> usize {
        self.extension_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extension_map.is_empty()
    }

    /// Iterates over every known `(extension, category)` pair.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Category)> + '_ {
        self.extension_map.iter().map(|(ext, cat)| (*ext, *cat))
    }
}

impl Default for FileMapper {
    fn default() -> Self {
        Self::new()
    }
}

/// Categorizes a path using the process-wide mapper.
pub fn categorize(path: &Path) -> Category {
    FileMapper::global().categorize(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_order_is_fixed() {
        let names: Vec<_> = Category::ALL.iter().map(|c| c.dir_name()).collect();
        assert_eq!(
            names,
            vec![
                "Images",
                "Documents",
                "Videos",
                "Audio",
                "Archives",
                "Code",
                "eBooks",
                "Others"
            ]
        );
        for (i, category) in Category::ALL.iter().enumerate() {
            assert_eq!(category.index(), i);
        }
    }

    #[test]
    fn test_display_matches_dir_name() {
        assert_eq!(Category::EBooks.to_string(), "eBooks");
        assert_eq!(Category::Code.to_string(), "Code");
    }

    #[test]
    fn test_every_extension_is_case_insensitive() {
        let mapper = FileMapper::global();
        for (ext, category) in mapper.iter() {
            let lower = format!("file.{}", ext);
            let upper = format!("file.{}", ext.to_uppercase());
            assert_eq!(mapper.categorize(Path::new(&lower)), category, "{}", lower);
            assert_eq!(mapper.categorize(Path::new(&upper)), category, "{}", upper);
        }
    }

    #[test]
    fn test_known_extensions() {
        assert_eq!(categorize(Path::new("a.JPG")), Category::Images);
        assert_eq!(categorize(Path::new("b.txt")), Category::Documents);
        assert_eq!(categorize(Path::new("clip.mkv")), Category::Videos);
        assert_eq!(categorize(Path::new("song.flac")), Category::Audio);
        assert_eq!(categorize(Path::new("main.rs")), Category::Code);
        assert_eq!(categorize(Path::new("novel.epub")), Category::EBooks);
    }

    #[test]
    fn test_last_suffix_decides() {
        assert_eq!(categorize(Path::new("archive.tar.gz")), Category::Archives);
        assert_eq!(categorize(Path::new("notes.md.bak")), Category::Others);
    }

    #[test]
    fn test_later_group_wins_on_duplicates() {
        assert_eq!(categorize(Path::new("index.ts")), Category::Code);
    }

    #[test]
    fn test_unknown_and_missing_extensions() {
        assert_eq!(categorize(Path::new("program.bin")), Category::Others);
        assert_eq!(categorize(Path::new("README")), Category::Others);
        assert_eq!(categorize(Path::new(".gitignore")), Category::Others);
        assert_eq!(categorize(Path::new("trailing.")), Category::Others);
    }

    #[test]
    fn test_full_path_uses_file_name_only() {
        assert_eq!(
            categorize(Path::new("/tmp/some.dir/photo.png")),
            Category::Images
        );
        assert_eq!(categorize(Path::new("/tmp/some.dir/README")), Category::Others);
    }

    #[test]
    fn test_extension_to_category() {
        let mapper = FileMapper::default();
        assert_eq!(mapper.extension_to_category("Mp3"), Some(Category::Audio));
        assert_eq!(mapper.extension_to_category("7z"), Some(Category::Archives));
        assert_eq!(mapper.extension_to_category(""), None);
        assert!(!mapper.is_empty());
    }
}
