// src/backend/storage/memory.rs
use ic_stable_structures::memory_manager::{MemoryId, MemoryManager, VirtualMemory};
use ic_stable_structures::DefaultMemoryImpl;
use std::cell::RefCell;

// Define Memory IDs for stable structures
// Choose non-overlapping IDs
const USERS_MEM_ID: MemoryId = MemoryId::new(0);
const INVITES_MEM_ID: MemoryId = MemoryId::new(1);
const COUPLES_MEM_ID: MemoryId = MemoryId::new(2);
const COLLECTIONS_MEM_ID: MemoryId = MemoryId::new(3);
const ITEMS_MEM_ID: MemoryId = MemoryId::new(4);
const COMMENTS_MEM_ID: MemoryId = MemoryId::new(5);
const EVENT_LOG_MEM_ID: MemoryId = MemoryId::new(6);
const EVENT_CURSOR_MEM_ID: MemoryId = MemoryId::new(7);
const METRICS_MEM_ID: MemoryId = MemoryId::new(8);
// Reserve IDs 9-19 for future record families.
// IDs 25+ are taken by the config cells, see storage/config.rs.

// Define memory type alias
pub type Memory = VirtualMemory<DefaultMemoryImpl>;

thread_local! {
    // Memory manager
    static MEMORY_MANAGER: RefCell<MemoryManager<DefaultMemoryImpl>> = RefCell::new(
        MemoryManager::init(DefaultMemoryImpl::default())
    );
}

/// Get memory instance for a specific MemoryId.
pub fn get_memory(id: MemoryId) -> Memory {
    MEMORY_MANAGER.with(|m| m.borrow().get(id))
}

// Functions to get specific memory instances
pub fn get_users_memory() -> Memory {
    get_memory(USERS_MEM_ID)
}

pub fn get_invites_memory() -> Memory {
    get_memory(INVITES_MEM_ID)
}

pub fn get_couples_memory() -> Memory {
    get_memory(COUPLES_MEM_ID)
}

pub fn get_collections_memory() -> Memory {
    get_memory(COLLECTIONS_MEM_ID)
}

pub fn get_items_memory() -> Memory {
    get_memory(ITEMS_MEM_ID)
}

pub fn get_comments_memory() -> Memory {
    get_memory(COMMENTS_MEM_ID)
}

pub fn get_event_log_memory() -> Memory {
    get_memory(EVENT_LOG_MEM_ID)
}

pub fn get_event_cursor_memory() -> Memory {
    get_memory(EVENT_CURSOR_MEM_ID)
}

pub fn get_metrics_memory() -> Memory {
    get_memory(METRICS_MEM_ID)
}
