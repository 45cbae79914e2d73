//! File classification support tools.
//!
//! A sandboxed [`FileSystemTool`] backing the file-classifier workflow:
//! list the `.txt` files in a directory, read a file's head or full content,
//! create category directories, and copy files into them. All operations go
//! through direct `std::fs` calls returning structured errors (no shell
//! processes are spawned), and every path is validated against the sandbox
//! root before use.
//!
//! # Example
//!
//! ```rust,no_run
//! use agentloop::tools::FileSystemTool;
//!
//! # fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let fs = FileSystemTool::new("/home/user/inbox");
//! for entry in fs.list_text_files(".")? {
//!     println!("{} ({} bytes)", entry.name, entry.size);
//! }
//! let head = fs.read_file_head("notes.txt", 10)?;
//! fs.create_directory("note")?;
//! fs.copy_file("notes.txt", "note")?;
//! # Ok(())
//! # }
//! ```

use std::error::Error;
use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Local};

use crate::agentloop::tool_protocol::{
    ToolParameter, ToolParameterType, ToolRegistry, ToolSchema,
};

/// Errors that can occur during file system operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSystemError {
    /// Path escapes the sandbox root (absolute path or `..` component).
    PathTraversal(String),
    /// Path does not exist.
    NotFound(String),
    /// A file operation was attempted on a directory.
    NotAFile(String),
    /// A directory operation was attempted on a file.
    NotADirectory(String),
    /// IO error with context.
    Io(String),
}

impl fmt::Display for FileSystemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileSystemError::PathTraversal(path) => {
                write!(f, "path escapes the sandbox root: {}", path)
            }
            FileSystemError::NotFound(path) => write!(f, "no such path: {}", path),
            FileSystemError::NotAFile(path) => write!(f, "not a file: {}", path),
            FileSystemError::NotADirectory(path) => write!(f, "not a directory: {}", path),
            FileSystemError::Io(msg) => write!(f, "io error: {}", msg),
        }
    }
}

impl Error for FileSystemError {}

/// One listing entry: name, size, and modification time when available.
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub name: String,
    pub size: u64,
    pub modified: Option<DateTime<Local>>,
}

/// Sandboxed filesystem access rooted at a fixed directory.
///
/// Paths handed to every method are interpreted relative to the root;
/// absolute paths and `..` components are rejected before touching the
/// filesystem.
pub struct FileSystemTool {
    root: PathBuf,
}

impl FileSystemTool {
    /// Create a tool rooted at `root`. Operations never escape it.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The sandbox root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, relative: &str) -> Result<PathBuf, FileSystemError> {
        let path = Path::new(relative);
        if path.is_absolute() {
            return Err(FileSystemError::PathTraversal(relative.to_string()));
        }
        for component in path.components() {
            match component {
                Component::ParentDir => {
                    return Err(FileSystemError::PathTraversal(relative.to_string()))
                }
                Component::Prefix(_) | Component::RootDir => {
                    return Err(FileSystemError::PathTraversal(relative.to_string()))
                }
                Component::CurDir | Component::Normal(_) => {}
            }
        }
        Ok(self.root.join(path))
    }

    fn io_error(path: &str, err: std::io::Error) -> FileSystemError {
        if err.kind() == std::io::ErrorKind::NotFound {
            FileSystemError::NotFound(path.to_string())
        } else {
            FileSystemError::Io(format!("{}: {}", path, err))
        }
    }

    /// List the `.txt` files directly inside `dir` (no recursion), sorted by
    /// name.
    pub fn list_text_files(&self, dir: &str) -> Result<Vec<FileEntry>, FileSystemError> {
        let resolved = self.resolve(dir)?;
        if resolved.exists() && !resolved.is_dir() {
            return Err(FileSystemError::NotADirectory(dir.to_string()));
        }
        let entries = fs::read_dir(&resolved).map_err(|err| Self::io_error(dir, err))?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| Self::io_error(dir, err))?;
            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("txt") {
                continue;
            }
            let metadata = entry.metadata().map_err(|err| Self::io_error(dir, err))?;
            files.push(FileEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                size: metadata.len(),
                modified: metadata.modified().ok().map(DateTime::<Local>::from),
            });
        }
        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }

    /// Read the first `lines` lines of a file.
    pub fn read_file_head(&self, path: &str, lines: usize) -> Result<String, FileSystemError> {
        let content = self.read_full_file(path)?;
        Ok(content
            .lines()
            .take(lines)
            .collect::<Vec<_>>()
            .join("\n"))
    }

    /// Read the complete content of a file.
    pub fn read_full_file(&self, path: &str) -> Result<String, FileSystemError> {
        let resolved = self.resolve(path)?;
        if resolved.is_dir() {
            return Err(FileSystemError::NotAFile(path.to_string()));
        }
        fs::read_to_string(&resolved).map_err(|err| Self::io_error(path, err))
    }

    /// Create a directory (and any missing parents) inside the sandbox.
    pub fn create_directory(&self, dir: &str) -> Result<(), FileSystemError> {
        let resolved = self.resolve(dir)?;
        fs::create_dir_all(&resolved).map_err(|err| Self::io_error(dir, err))
    }

    /// Copy `source` into the directory `destination`, keeping the file
    /// name. Returns the copied file's name.
    pub fn copy_file(&self, source: &str, destination: &str) -> Result<String, FileSystemError> {
        let from = self.resolve(source)?;
        if !from.is_file() {
            return Err(if from.exists() {
                FileSystemError::NotAFile(source.to_string())
            } else {
                FileSystemError::NotFound(source.to_string())
            });
        }
        let dest_dir = self.resolve(destination)?;
        if !dest_dir.is_dir() {
            return Err(FileSystemError::NotADirectory(destination.to_string()));
        }
        let file_name = from
            .file_name()
            .ok_or_else(|| FileSystemError::NotAFile(source.to_string()))?
            .to_string_lossy()
            .into_owned();
        fs::copy(&from, dest_dir.join(&file_name)).map_err(|err| Self::io_error(source, err))?;
        Ok(file_name)
    }
}

fn string_arg(params: &serde_json::Value, name: &str) -> Result<String, Box<dyn Error + Send + Sync>> {
    params[name]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| format!("argument '{}' is missing or not a string", name).into())
}

/// Install the five classifier-support tools into `registry`, all backed by
/// the same sandboxed `tool`.
pub fn register_filesystem_tools(registry: &mut ToolRegistry, tool: Arc<FileSystemTool>) {
    let fs = Arc::clone(&tool);
    registry.register(
        ToolSchema::new("list_text_files", "List .txt files in a directory").with_parameter(
            ToolParameter::new("directory", ToolParameterType::String)
                .with_description("Directory path to list files from, relative to the workspace")
                .with_default(serde_json::json!(".")),
        ),
        Arc::new(move |params| {
            let dir = params["directory"].as_str().unwrap_or(".").to_string();
            let files = fs.list_text_files(&dir)?;
            let mut out = format!("Found {} .txt files:", files.len());
            for entry in files {
                out.push('\n');
                out.push_str(&entry.name);
                out.push_str(&format!(" ({} bytes", entry.size));
                if let Some(modified) = entry.modified {
                    out.push_str(&format!(", modified {}", modified.format("%Y-%m-%d %H:%M:%S")));
                }
                out.push(')');
            }
            Ok(out)
        }),
    );

    let fs = Arc::clone(&tool);
    registry.register(
        ToolSchema::new(
            "read_file_head",
            "Read the first few lines of a file to understand its content",
        )
        .with_parameter(
            ToolParameter::new("filepath", ToolParameterType::String)
                .with_description("Path to the file to read")
                .required(),
        )
        .with_parameter(
            ToolParameter::new("lines", ToolParameterType::Number)
                .with_description("Number of lines to read from the beginning")
                .with_default(serde_json::json!(10)),
        ),
        Arc::new(move |params| {
            let path = string_arg(&params, "filepath")?;
            let lines = params["lines"].as_u64().unwrap_or(10) as usize;
            let head = fs.read_file_head(&path, lines)?;
            Ok(format!("First {} lines of {}:\n{}", lines, path, head))
        }),
    );

    let fs = Arc::clone(&tool);
    registry.register(
        ToolSchema::new(
            "read_full_file",
            "Read the complete content of a file if needed for better classification",
        )
        .with_parameter(
            ToolParameter::new("filepath", ToolParameterType::String)
                .with_description("Path to the file to read completely")
                .required(),
        ),
        Arc::new(move |params| {
            let path = string_arg(&params, "filepath")?;
            let content = fs.read_full_file(&path)?;
            Ok(format!("Full content of {}:\n{}", path, content))
        }),
    );

    let fs = Arc::clone(&tool);
    registry.register(
        ToolSchema::new("create_directory", "Create a directory for file classification")
            .with_parameter(
                ToolParameter::new("directory", ToolParameterType::String)
                    .with_description("Directory name to create")
                    .required(),
            ),
        Arc::new(move |params| {
            let dir = string_arg(&params, "directory")?;
            fs.create_directory(&dir)?;
            Ok(format!("Created directory: {}", dir))
        }),
    );

    let fs = Arc::clone(&tool);
    registry.register(
        ToolSchema::new("copy_file", "Copy a file to a target directory")
            .with_parameter(
                ToolParameter::new("source", ToolParameterType::String)
                    .with_description("Source file path")
                    .required(),
            )
            .with_parameter(
                ToolParameter::new("destination", ToolParameterType::String)
                    .with_description("Destination directory path")
                    .required(),
            ),
        Arc::new(move |params| {
            let source = string_arg(&params, "source")?;
            let destination = string_arg(&params, "destination")?;
            let file_name = fs.copy_file(&source, &destination)?;
            Ok(format!("Copied {} to {}/", file_name, destination))
        }),
    );
}
