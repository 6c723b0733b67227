//! OBJ loader for `v`/`vt`/`vn`/`f` records.
//!
//! Faces are not triangulated: every corner of every face lands in the index
//! buffer in file order. Unique `(position, texcoord, normal)` corners get a
//! slot in first-occurrence order and the attribute buffers are laid out by
//! slot. Texture V is negated on the way out.

use std::{
    collections::HashMap,
    io::{self, BufRead},
};

use corelib::{Attribute, LoadError, LoadResult};

use crate::{
    mesh::MeshBuffer,
    options::{LoadOptions, MissingAttribute},
    resource::ResourceResolver,
};

const FALLBACK_UV: [f32; 2] = [0.0, 0.0];
const FALLBACK_NORMAL: [f32; 3] = [0.0, 0.0, 1.0];

/// Load an OBJ mesh through `resolver` with default options.
pub fn load_model<S>(resource: &str, resolver: &S) -> LoadResult<MeshBuffer>
where
    S: ResourceResolver + ?Sized,
{
    load_model_with(resource, resolver, &LoadOptions::default())
}

/// Load an OBJ mesh through `resolver`.
///
/// The reader is owned by this call and dropped before it returns, whatever
/// the outcome.
pub fn load_model_with<S>(
    resource: &str,
    resolver: &S,
    options: &LoadOptions,
) -> LoadResult<MeshBuffer>
where
    S: ResourceResolver + ?Sized,
{
    let reader = resolver
        .open(resource)
        .map_err(|source| LoadError::ResourceNotFound {
            resource: resource.to_owned(),
            source,
        })?;
    parse_model(reader, options)
}

/// Convenience helper to parse an OBJ string literal.
pub fn load_obj_from_str(contents: &str) -> LoadResult<MeshBuffer> {
    parse_model(io::Cursor::new(contents), &LoadOptions::default())
}

/// Parse an OBJ stream that is already open.
pub fn parse_model<R: BufRead>(reader: R, options: &LoadOptions) -> LoadResult<MeshBuffer> {
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut texcoords: Vec<[f32; 2]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();
    let mut table = VertexTable::default();
    let mut indices: Vec<u32> = Vec::new();

    for (line_idx, line) in reader.lines().enumerate() {
        let line_no = line_idx + 1;
        if options.is_cancelled() {
            return Err(LoadError::Cancelled);
        }
        let line = line.map_err(|source| LoadError::Io {
            line: line_no,
            source,
        })?;
        let rec = Record {
            line_no,
            text: &line,
        };

        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("v") => positions.push(rec.floats(&mut parts, ["x", "y", "z"])?),
            Some("vt") => texcoords.push(rec.floats(&mut parts, ["u", "v"])?),
            Some("vn") => normals.push(rec.floats(&mut parts, ["nx", "ny", "nz"])?),
            Some("f") => {
                let counts = [positions.len(), texcoords.len(), normals.len()];
                for corner in parts {
                    let key = rec.corner(corner, counts, options.missing)?;
                    indices.push(table.slot_for(key, line_no)?);
                }
            }
            // Comments, groups, materials, smoothing groups, blank lines.
            _ => {}
        }
    }

    let has_texture = !texcoords.is_empty();
    let n = table.len();
    let mut out_positions = Vec::with_capacity(n * 3);
    let mut out_texcoords = Vec::with_capacity(if has_texture { n * 2 } else { 0 });
    let mut out_normals = Vec::with_capacity(n * 3);

    // Insertion order defines which corner owns slot i.
    for &(key, line) in &table.order {
        let position = fetch(&positions, key.position, Attribute::Position, line)?;
        out_positions.extend_from_slice(&position);

        let normal = match key.normal {
            Some(i) => fetch(&normals, i, Attribute::Normal, line)?,
            None => FALLBACK_NORMAL,
        };
        out_normals.extend_from_slice(&normal);

        if has_texture {
            let [u, v] = match key.texcoord {
                Some(i) => fetch(&texcoords, i, Attribute::TexCoord, line)?,
                None => FALLBACK_UV,
            };
            out_texcoords.extend_from_slice(&[u, -v]);
        }
    }

    Ok(MeshBuffer::new(
        out_positions,
        out_texcoords,
        out_normals,
        indices,
        has_texture,
    ))
}

/// Face corner identity. Absent fields are `None` only under
/// [`MissingAttribute::Fallback`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
struct CornerKey {
    position: usize,
    texcoord: Option<usize>,
    normal: Option<usize>,
}

/// Corner -> slot map plus the insertion order of its keys, each tagged with
/// the line it first appeared on.
#[derive(Default)]
struct VertexTable {
    slots: HashMap<CornerKey, u32>,
    order: Vec<(CornerKey, usize)>,
}

impl VertexTable {
    fn len(&self) -> usize {
        self.order.len()
    }

    fn slot_for(&mut self, key: CornerKey, line_no: usize) -> LoadResult<u32> {
        if let Some(&slot) = self.slots.get(&key) {
            return Ok(slot);
        }
        let slot = u32::try_from(self.order.len()).map_err(|_| LoadError::TooManyVertices)?;
        self.slots.insert(key, slot);
        self.order.push((key, line_no));
        Ok(slot)
    }
}

fn fetch<const N: usize>(
    items: &[[f32; N]],
    index: usize,
    attribute: Attribute,
    line: usize,
) -> LoadResult<[f32; N]> {
    items
        .get(index)
        .copied()
        .ok_or(LoadError::IndexOutOfRange {
            line,
            attribute,
            index,
            len: items.len(),
        })
}

/// One source line, kept around for error reporting.
struct Record<'a> {
    line_no: usize,
    text: &'a str,
}

impl Record<'_> {
    /// 1-based byte column of `token`, which must be a subslice of the line.
    /// `None` points just past the end of the line.
    fn column(&self, token: Option<&str>) -> usize {
        match token {
            Some(t) => t.as_ptr() as usize - self.text.as_ptr() as usize + 1,
            None => self.text.len() + 1,
        }
    }

    fn malformed(&self, token: Option<&str>, reason: impl Into<String>) -> LoadError {
        LoadError::MalformedRecord {
            line: self.line_no,
            column: self.column(token),
            text: self.text.to_owned(),
            reason: reason.into(),
        }
    }

    fn floats<'t, const N: usize>(
        &self,
        parts: &mut impl Iterator<Item = &'t str>,
        names: [&str; N],
    ) -> LoadResult<[f32; N]> {
        let mut out = [0.0; N];
        for (slot, name) in out.iter_mut().zip(names) {
            let token = parts
                .next()
                .ok_or_else(|| self.malformed(None, format!("missing {name} coordinate")))?;
            *slot = token.parse::<f32>().map_err(|e| {
                self.malformed(Some(token), format!("invalid {name} coordinate '{token}': {e}"))
            })?;
        }
        Ok(out)
    }

    /// Parse `p`, `p/t`, `p/t/n` or `p//n` into a key.
    /// `counts` are the raw attribute lengths so far, for relative indices.
    fn corner(
        &self,
        token: &str,
        counts: [usize; 3],
        missing: MissingAttribute,
    ) -> LoadResult<CornerKey> {
        let mut fields = token.split('/');
        let pos = fields.next().unwrap_or_default();
        let tex = fields.next().filter(|s| !s.is_empty());
        let norm = fields.next().filter(|s| !s.is_empty());
        if fields.next().is_some() {
            return Err(self.malformed(
                Some(token),
                format!("face corner '{token}' has more than three fields"),
            ));
        }
        if pos.is_empty() {
            return Err(self.malformed(
                Some(token),
                format!("face corner '{token}' has no position index"),
            ));
        }

        let absent = match missing {
            MissingAttribute::AliasFirst => Some(0),
            MissingAttribute::Fallback => None,
        };
        let [pos_count, tex_count, norm_count] = counts;
        Ok(CornerKey {
            position: self.index(pos, pos_count)?,
            texcoord: match tex {
                Some(t) => Some(self.index(t, tex_count)?),
                None => absent,
            },
            normal: match norm {
                Some(n) => Some(self.index(n, norm_count)?),
                None => absent,
            },
        })
    }

    /// 1-based index to 0-based. Negative indices count back from `len`.
    fn index(&self, token: &str, len: usize) -> LoadResult<usize> {
        let raw = token
            .parse::<i64>()
            .map_err(|e| self.malformed(Some(token), format!("invalid index '{token}': {e}")))?;
        if raw == 0 {
            return Err(self.malformed(Some(token), "OBJ indices are 1-based; found 0"));
        }
        let resolved = if raw > 0 {
            usize::try_from(raw - 1).ok()
        } else {
            usize::try_from(raw.unsigned_abs())
                .ok()
                .and_then(|back| len.checked_sub(back))
        };
        resolved.ok_or_else(|| {
            self.malformed(
                Some(token),
                format!("index {raw} does not resolve (len={len})"),
            )
        })
    }
}
