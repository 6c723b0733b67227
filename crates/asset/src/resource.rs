//! Resource resolution: turning a resource id into a readable line stream.
//!
//! The loader never touches the filesystem itself. Hosts hand it a
//! [`ResourceResolver`]; the two provided here cover an on-disk asset
//! directory and an in-memory table.

use std::{
    collections::HashMap,
    fs::File,
    io::{self, BufRead, BufReader, Cursor},
    path::{Component, Path, PathBuf},
};

/// Opens named resources. Any error is reported by the loader as
/// `ResourceNotFound`.
pub trait ResourceResolver {
    fn open(&self, resource: &str) -> io::Result<Box<dyn BufRead + '_>>;
}

impl<F, R> ResourceResolver for F
where
    F: Fn(&str) -> io::Result<R>,
    R: BufRead + 'static,
{
    fn open(&self, resource: &str) -> io::Result<Box<dyn BufRead + '_>> {
        Ok(Box::new(self(resource)?))
    }
}

/// Resolves ids as relative paths under a root directory.
#[derive(Clone, Debug)]
pub struct DirResolver {
    root: PathBuf,
}

impl DirResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Joins `resource` onto the root, refusing ids that would escape it.
    pub fn resolve(&self, resource: &str) -> io::Result<PathBuf> {
        let rel = Path::new(resource);
        let escapes = rel.components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if escapes || resource.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("resource id '{resource}' is not a relative path inside the root"),
            ));
        }
        Ok(self.root.join(rel))
    }
}

impl ResourceResolver for DirResolver {
    fn open(&self, resource: &str) -> io::Result<Box<dyn BufRead + '_>> {
        let path = self.resolve(resource)?;
        log::debug!("Opening resource '{}' at {}", resource, path.display());
        let file = File::open(&path)?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Named in-memory resources, e.g. models embedded with `include_str!`.
#[derive(Clone, Debug, Default)]
pub struct MemoryResolver {
    entries: HashMap<String, String>,
}

impl MemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, resource: impl Into<String>, contents: impl Into<String>) {
        self.entries.insert(resource.into(), contents.into());
    }

    pub fn with(mut self, resource: impl Into<String>, contents: impl Into<String>) -> Self {
        self.insert(resource, contents);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ResourceResolver for MemoryResolver {
    fn open(&self, resource: &str) -> io::Result<Box<dyn BufRead + '_>> {
        let contents = self.entries.get(resource).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no in-memory resource named '{resource}'"),
            )
        })?;
        log::debug!("Opening in-memory resource '{}'", resource);
        Ok(Box::new(Cursor::new(contents.as_bytes())))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use super::*;

    fn read_all(mut reader: Box<dyn BufRead + '_>) -> String {
        let mut s = String::new();
        reader.read_to_string(&mut s).expect("read");
        s
    }

    #[test]
    fn memory_resolver_opens_known_ids() {
        let res = MemoryResolver::new().with("cube.obj", "v 0 0 0\n");
        assert_eq!(res.len(), 1);
        assert_eq!(read_all(res.open("cube.obj").expect("open")), "v 0 0 0\n");
        let err = res.open("missing.obj").err().expect("not found");
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn dir_resolver_reads_relative_paths() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(dir.path().join("models")).expect("mkdir");
        std::fs::write(dir.path().join("models/ring.obj"), "vn 0 1 0\n").expect("write");

        let res = DirResolver::new(dir.path());
        assert_eq!(
            read_all(res.open("models/ring.obj").expect("open")),
            "vn 0 1 0\n"
        );
        let err = res.open("models/none.obj").err().expect("not found");
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn dir_resolver_refuses_escaping_ids() {
        let res = DirResolver::new("/srv/assets");
        for id in ["../secret.obj", "/etc/passwd", "models/../../x.obj", ""] {
            let err = res.resolve(id).expect_err(id);
            assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        }
        assert_eq!(
            res.resolve("a/b.obj").expect("inside"),
            PathBuf::from("/srv/assets/a/b.obj")
        );
    }

    #[test]
    fn closures_are_resolvers() {
        let res = |id: &str| -> io::Result<Cursor<Vec<u8>>> {
            Ok(Cursor::new(format!("# {id}\n").into_bytes()))
        };
        assert_eq!(read_all(res.open("x").expect("open")), "# x\n");
    }
}
