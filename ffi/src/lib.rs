//! C-linkage interface to [`bittree::AmrMesh`].
//!
//! Every call goes through an explicit handle made by [`bittree_create`].
//! Integers are signed so that `-1` can mark "no block": out-of-domain
//! coordinates, unknown ids and levels. Status-returning calls give
//! [`BITTREE_OK`] or a negative code and log the cause.
//!
//! The dimension is fixed when the library is built: feature `dim3` wins
//! over `dim1`, which wins over the default `dim2`.

#![allow(clippy::missing_safety_doc)]

mod comm;

pub use comm::{BittreeAllReduce, BittreeComm, BITTREE_OP_AND, BITTREE_OP_OR};

use bittree::{AmrMesh, BittreeError, BittreeResult, Block, RenderKind};
use comm::CallbackComm;
use log::error;
use std::os::raw::{c_char, c_int};
use std::slice;

#[cfg(feature = "dim3")]
pub const NDIM: usize = 3;
#[cfg(all(feature = "dim1", not(feature = "dim3")))]
pub const NDIM: usize = 1;
#[cfg(not(any(feature = "dim1", feature = "dim3")))]
pub const NDIM: usize = 2;

pub const BITTREE_OK: c_int = 0;
/// Bad argument: sizes, ids, ranges, null pointers.
pub const BITTREE_EINVAL: c_int = -1;
/// Call not allowed in the current transaction state.
pub const BITTREE_ESTATE: c_int = -2;
/// The host reduction failed.
pub const BITTREE_ECOMM: c_int = -3;

pub struct BittreeHandle {
    mesh: AmrMesh<NDIM>,
}

fn status(result: BittreeResult<()>) -> c_int {
    match result {
        Ok(()) => BITTREE_OK,
        Err(err) => {
            error!("bittree: {err}");
            match err {
                BittreeError::AlreadyRefining => BITTREE_ESTATE,
                BittreeError::Collective(_) => BITTREE_ECOMM,
                _ => BITTREE_EINVAL,
            }
        }
    }
}

unsafe fn mesh<'a>(handle: *const BittreeHandle) -> Option<&'a AmrMesh<NDIM>> {
    handle.as_ref().map(|h| &h.mesh)
}

fn to_int(x: usize) -> c_int {
    c_int::try_from(x).unwrap_or(-1)
}

fn to_index(x: c_int) -> Option<usize> {
    usize::try_from(x).ok()
}

unsafe fn read_coord(ijk: *const c_int) -> Option<[u32; NDIM]> {
    let ijk = slice::from_raw_parts(ijk, NDIM);
    let mut coord = [0u32; NDIM];
    for (c, &x) in coord.iter_mut().zip(ijk) {
        *c = u32::try_from(x).ok()?;
    }
    Some(coord)
}

unsafe fn write_block(block: Option<Block<NDIM>>, lev: *mut c_int, ijk: *mut c_int, mort: *mut c_int) {
    let ijk = slice::from_raw_parts_mut(ijk, NDIM);
    match block {
        Some(b) => {
            *lev = to_int(b.level);
            *mort = to_int(b.mort);
            for (out, &c) in ijk.iter_mut().zip(&b.coord) {
                *out = c as c_int;
            }
        }
        None => {
            *lev = -1;
            *mort = -1;
            ijk.fill(-1);
        }
    }
}

/// Builds a single-level tree over a `top` grid. `includes` holds one flag
/// per top-level cell in row-major order, dimension 0 fastest. Returns null
/// on invalid input.
#[no_mangle]
pub unsafe extern "C" fn bittree_create(
    top: *const c_int,
    includes: *const bool,
) -> *mut BittreeHandle {
    if top.is_null() || includes.is_null() {
        error!("bittree_create: null argument");
        return std::ptr::null_mut();
    }
    let top = slice::from_raw_parts(top, NDIM);
    let mut extents = [0u32; NDIM];
    for (e, &t) in extents.iter_mut().zip(top) {
        *e = u32::try_from(t).unwrap_or(0);
    }
    let pop: usize = extents.iter().map(|&e| e as usize).product();
    let includes = slice::from_raw_parts(includes, pop);
    match AmrMesh::new(extents, includes) {
        Ok(mesh) => Box::into_raw(Box::new(BittreeHandle { mesh })),
        Err(err) => {
            error!("bittree_create: {err}");
            std::ptr::null_mut()
        }
    }
}

#[no_mangle]
pub unsafe extern "C" fn bittree_destroy(handle: *mut BittreeHandle) {
    if !handle.is_null() {
        drop(Box::from_raw(handle));
    }
}

#[no_mangle]
pub unsafe extern "C" fn bittree_initialized(handle: *const BittreeHandle) -> bool {
    !handle.is_null()
}

#[no_mangle]
pub unsafe extern "C" fn bittree_level_count(handle: *const BittreeHandle, updated: bool) -> c_int {
    mesh(handle).map_or(-1, |m| to_int(m.level_count(updated)))
}

#[no_mangle]
pub unsafe extern "C" fn bittree_block_count(handle: *const BittreeHandle, updated: bool) -> c_int {
    mesh(handle).map_or(-1, |m| to_int(m.block_count(updated)))
}

#[no_mangle]
pub unsafe extern "C" fn bittree_leaf_count(handle: *const BittreeHandle, updated: bool) -> c_int {
    mesh(handle).map_or(-1, |m| to_int(m.leaf_count(updated)))
}

#[no_mangle]
pub unsafe extern "C" fn bittree_delta_count(handle: *const BittreeHandle) -> c_int {
    mesh(handle).map_or(-1, |m| to_int(m.delta_count()))
}

#[no_mangle]
pub unsafe extern "C" fn bittree_check_refine_bit(handle: *const BittreeHandle, id: c_int) -> bool {
    match (mesh(handle), to_index(id)) {
        (Some(m), Some(id)) => m.check_refine_bit(id),
        _ => false,
    }
}

#[no_mangle]
pub unsafe extern "C" fn bittree_is_parent(
    handle: *const BittreeHandle,
    updated: bool,
    id: c_int,
) -> bool {
    match (mesh(handle), to_index(id)) {
        (Some(m), Some(id)) => m.is_parent(updated, id),
        _ => false,
    }
}

/// On entry `lev`/`ijk` name the wanted level and coordinate; on return they
/// hold the block actually found, which may be coarser. All of `lev`, `mort`
/// and `id` are -1 when the coordinate lies outside the domain.
#[no_mangle]
pub unsafe extern "C" fn bittree_identify(
    handle: *const BittreeHandle,
    updated: bool,
    lev: *mut c_int,
    ijk: *mut c_int,
    mort: *mut c_int,
    id: *mut c_int,
) {
    if lev.is_null() || ijk.is_null() || mort.is_null() || id.is_null() {
        return;
    }
    let found = match (mesh(handle), to_index(*lev), read_coord(ijk)) {
        (Some(m), Some(level), Some(coord)) => m.identify(updated, level, &coord),
        _ => None,
    };
    match found {
        Some(b) => {
            *id = to_int(b.id);
            write_block(Some(b), lev, ijk, mort);
        }
        None => {
            // coordinates are left as given
            *lev = -1;
            *mort = -1;
            *id = -1;
        }
    }
}

/// Level, coordinate and Morton index of block `id`; all -1 for an id that
/// names no block.
#[no_mangle]
pub unsafe extern "C" fn bittree_locate(
    handle: *const BittreeHandle,
    updated: bool,
    id: c_int,
    lev: *mut c_int,
    ijk: *mut c_int,
    mort: *mut c_int,
) {
    if lev.is_null() || ijk.is_null() || mort.is_null() {
        return;
    }
    let found = match (mesh(handle), to_index(id)) {
        (Some(m), Some(id)) => m.locate(updated, id),
        _ => None,
    };
    write_block(found, lev, ijk, mort);
}

#[no_mangle]
pub unsafe extern "C" fn bittree_get_id0(handle: *const BittreeHandle, updated: bool) -> c_int {
    mesh(handle).map_or(-1, |m| to_int(m.top_id0(updated)))
}

/// Writes the first and one-past-last id of level `lev` to `ids[0..2]`, or
/// -1 twice when the level does not exist.
#[no_mangle]
pub unsafe extern "C" fn bittree_level_id_limits(
    handle: *const BittreeHandle,
    updated: bool,
    lev: c_int,
    ids: *mut c_int,
) -> c_int {
    if ids.is_null() {
        return BITTREE_EINVAL;
    }
    let ids = slice::from_raw_parts_mut(ids, 2);
    let limits = match (mesh(handle), to_index(lev)) {
        (Some(m), Some(lev)) => m.level_id_limits(updated, lev),
        _ => None,
    };
    match limits {
        Some(range) => {
            ids[0] = to_int(range.start);
            ids[1] = to_int(range.end);
            BITTREE_OK
        }
        None => {
            ids.fill(-1);
            BITTREE_EINVAL
        }
    }
}

/// Ids of the blocks at Morton positions `[mort_min, mort_max)` into `out`,
/// which must hold `mort_max - mort_min` entries.
#[no_mangle]
pub unsafe extern "C" fn bittree_get_bitid_list(
    handle: *const BittreeHandle,
    updated: bool,
    mort_min: c_int,
    mort_max: c_int,
    out: *mut c_int,
) -> c_int {
    let (Some(m), Some(min), Some(max)) = (mesh(handle), to_index(mort_min), to_index(mort_max))
    else {
        return BITTREE_EINVAL;
    };
    if out.is_null() {
        return BITTREE_EINVAL;
    }
    match m.bitid_list(updated, min, max) {
        Ok(ids) => {
            let out = slice::from_raw_parts_mut(out, ids.len());
            for (o, id) in out.iter_mut().zip(ids) {
                *o = to_int(id);
            }
            BITTREE_OK
        }
        Err(err) => status(Err(err)),
    }
}

#[no_mangle]
pub unsafe extern "C" fn bittree_refine_init(handle: *const BittreeHandle) -> c_int {
    mesh(handle).map_or(BITTREE_EINVAL, |m| status(m.refine_init()))
}

#[no_mangle]
pub unsafe extern "C" fn bittree_refine_mark(
    handle: *const BittreeHandle,
    id: c_int,
    value: bool,
) -> c_int {
    match (mesh(handle), to_index(id)) {
        (Some(m), Some(id)) => status(m.refine_mark(id, value)),
        _ => BITTREE_EINVAL,
    }
}

/// OR-merges the delta through the host communicator. Collective.
#[no_mangle]
pub unsafe extern "C" fn bittree_refine_reduce(
    handle: *const BittreeHandle,
    comm: *const BittreeComm,
) -> c_int {
    match (mesh(handle), comm.as_ref()) {
        (Some(m), Some(&comm)) => status(m.refine_reduce(&CallbackComm::new(comm))),
        _ => BITTREE_EINVAL,
    }
}

/// AND-merges the delta through the host communicator. Collective.
#[no_mangle]
pub unsafe extern "C" fn bittree_refine_reduce_and(
    handle: *const BittreeHandle,
    comm: *const BittreeComm,
) -> c_int {
    match (mesh(handle), comm.as_ref()) {
        (Some(m), Some(&comm)) => status(m.refine_reduce_and(&CallbackComm::new(comm))),
        _ => BITTREE_EINVAL,
    }
}

#[no_mangle]
pub unsafe extern "C" fn bittree_refine_update(handle: *const BittreeHandle) -> c_int {
    mesh(handle).map_or(BITTREE_EINVAL, |m| status(m.refine_update()))
}

#[no_mangle]
pub unsafe extern "C" fn bittree_refine_apply(handle: *const BittreeHandle) -> c_int {
    mesh(handle).map_or(BITTREE_EINVAL, |m| status(m.refine_apply()))
}

/// Renders the mesh (0 = ids, 1 = Morton indices, 2 = parent flags) into
/// `buf` as a NUL-terminated string, truncated to `cap` bytes. Returns the
/// buffer size needed for the whole text, or -1.
#[no_mangle]
pub unsafe extern "C" fn bittree_render(
    handle: *const BittreeHandle,
    kind: c_int,
    slice_k: c_int,
    buf: *mut c_char,
    cap: usize,
) -> c_int {
    let kind = u32::try_from(kind).ok().and_then(RenderKind::from_index);
    let (Some(m), Some(kind), Ok(slice_k)) = (mesh(handle), kind, u32::try_from(slice_k)) else {
        return -1;
    };
    let text = m.render(kind, slice_k);
    let bytes = text.as_bytes();
    if !buf.is_null() && cap > 0 {
        let n = bytes.len().min(cap - 1);
        let out = slice::from_raw_parts_mut(buf as *mut u8, cap);
        out[..n].copy_from_slice(&bytes[..n]);
        out[n] = 0;
    }
    to_int(bytes.len() + 1)
}
