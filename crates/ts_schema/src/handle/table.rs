use core::any::TypeId;
use std::sync::{PoisonError, RwLock};

use ts_utils::TypeIdMap;

use super::TypeHandle;

// Process-wide handle table. Handles are never removed.
static HANDLES: RwLock<TypeIdMap<TypeHandle>> = RwLock::new(TypeIdMap::new());

pub(super) fn intern(type_id: TypeId, init: impl FnOnce() -> TypeHandle) -> TypeHandle {
    if let Some(handle) = HANDLES
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&type_id)
    {
        return handle.clone();
    }

    // Built outside the lock: `init` may intern the handles of its arguments.
    let handle = init();

    HANDLES
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(type_id, || handle)
        .clone()
}
