use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::RwLock;
use thiserror::Error as ThisError;

use crate::ds::hash::Hash;
use crate::ds::list::List;
use crate::ds::set::Set;
use crate::ds::zset::SortedSet;

pub const DEFAULT_SHARDS: usize = 16;

/// A key exists iff it maps to an entity; the variant tag is the sole
/// source of type identity for every command.
#[derive(Clone, Debug)]
pub enum Entity {
    String(Bytes),
    List(List),
    Hash(Hash),
    Set(Set),
    ZSet(SortedSet),
}

/// The entity under the key holds a different kind of value.
#[derive(Clone, Copy, Debug, PartialEq, ThisError)]
#[error("WRONGTYPE Operation against a key holding the wrong kind of value")]
pub struct WrongType;

/// Cheap cloneable handle to the sharded keyspace. Keys route to a shard by
/// FNV-1a hash, so two commands on unrelated keys rarely contend on the
/// same lock. The shard lock is held only long enough to look up or insert
/// an entity; container mutation happens under the container's own lock.
#[derive(Clone)]
pub struct Store {
    shared: Arc<Shared>,
}

struct Shared {
    shards: Box<[Shard]>,
    size: AtomicI64,
}

#[derive(Default)]
struct Shard {
    entries: RwLock<HashMap<String, Entity>>,
}

impl Store {
    pub fn new() -> Store {
        Store::with_shards(DEFAULT_SHARDS)
    }

    /// `requested` is raised to at least 16 and rounded up to a power of
    /// two so routing can mask instead of dividing.
    pub fn with_shards(requested: usize) -> Store {
        let count = requested.max(DEFAULT_SHARDS).next_power_of_two();
        let shards = (0..count).map(|_| Shard::default()).collect();
        Store {
            shared: Arc::new(Shared {
                shards,
                size: AtomicI64::new(0),
            }),
        }
    }

    fn shard(&self, key: &str) -> &Shard {
        let index = fnv1a32(key) as usize & (self.shared.shards.len() - 1);
        &self.shared.shards[index]
    }

    pub fn get(&self, key: &str) -> Option<Entity> {
        self.shard(key).entries.read().get(key).cloned()
    }

    /// Inserts or overwrites; returns whether the key was absent before.
    pub fn put(&self, key: String, entity: Entity) -> bool {
        let fresh = self
            .shard(&key)
            .entries
            .write()
            .insert(key, entity)
            .is_none();
        if fresh {
            self.shared.size.fetch_add(1, Ordering::Relaxed);
        }
        fresh
    }

    pub fn del(&self, key: &str) -> bool {
        let removed = self.shard(key).entries.write().remove(key).is_some();
        if removed {
            self.shared.size.fetch_sub(1, Ordering::Relaxed);
        }
        removed
    }

    /// Live keys across all shards. Reads the atomic counter, so the value
    /// is approximate while writers are active.
    pub fn len(&self) -> i64 {
        self.shared.size.load(Ordering::Relaxed)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        for shard in self.shared.shards.iter() {
            shard.entries.write().clear();
        }
        self.shared.size.store(0, Ordering::Relaxed);
    }

    /// Visits shards in order, holding each shard's write lock for the
    /// whole visit so the consumer sees that shard consistently. The view
    /// across shards is not atomic. Returning `false` stops the walk.
    pub fn for_each(&self, mut consumer: impl FnMut(&str, &Entity) -> bool) {
        for shard in self.shared.shards.iter() {
            let entries = shard.entries.write();
            for (key, entity) in entries.iter() {
                if !consumer(key, entity) {
                    return;
                }
            }
        }
    }

    pub fn string(&self, key: &str) -> Result<Option<Bytes>, WrongType> {
        match self.get(key) {
            Some(Entity::String(value)) => Ok(Some(value)),
            Some(_) => Err(WrongType),
            None => Ok(None),
        }
    }

    pub fn list(&self, key: &str) -> Result<Option<List>, WrongType> {
        match self.get(key) {
            Some(Entity::List(list)) => Ok(Some(list)),
            Some(_) => Err(WrongType),
            None => Ok(None),
        }
    }

    pub fn hash(&self, key: &str) -> Result<Option<Hash>, WrongType> {
        match self.get(key) {
            Some(Entity::Hash(hash)) => Ok(Some(hash)),
            Some(_) => Err(WrongType),
            None => Ok(None),
        }
    }

    pub fn set(&self, key: &str) -> Result<Option<Set>, WrongType> {
        match self.get(key) {
            Some(Entity::Set(set)) => Ok(Some(set)),
            Some(_) => Err(WrongType),
            None => Ok(None),
        }
    }

    pub fn zset(&self, key: &str) -> Result<Option<SortedSet>, WrongType> {
        match self.get(key) {
            Some(Entity::ZSet(zset)) => Ok(Some(zset)),
            Some(_) => Err(WrongType),
            None => Ok(None),
        }
    }

    pub fn list_or_create(&self, key: &str) -> Result<List, WrongType> {
        self.entity_or_create(key, || Entity::List(List::new()), |entity| {
            match entity {
                Entity::List(list) => Some(list.clone()),
                _ => None,
            }
        })
    }

    pub fn hash_or_create(&self, key: &str) -> Result<Hash, WrongType> {
        self.entity_or_create(key, || Entity::Hash(Hash::new()), |entity| {
            match entity {
                Entity::Hash(hash) => Some(hash.clone()),
                _ => None,
            }
        })
    }

    pub fn set_or_create(&self, key: &str) -> Result<Set, WrongType> {
        self.entity_or_create(key, || Entity::Set(Set::new()), |entity| {
            match entity {
                Entity::Set(set) => Some(set.clone()),
                _ => None,
            }
        })
    }

    pub fn zset_or_create(&self, key: &str) -> Result<SortedSet, WrongType> {
        self.entity_or_create(key, || Entity::ZSet(SortedSet::new()), |entity| {
            match entity {
                Entity::ZSet(zset) => Some(zset.clone()),
                _ => None,
            }
        })
    }

    /// Write-path lookup: hands back the container under `key`, creating it
    /// when the key is absent. Creation and counter update happen under the
    /// shard write lock so concurrent creators agree on one container.
    fn entity_or_create<T>(
        &self,
        key: &str,
        create: impl FnOnce() -> Entity,
        extract: impl Fn(&Entity) -> Option<T>,
    ) -> Result<T, WrongType> {
        let shard = self.shard(key);
        let mut entries = shard.entries.write();
        match entries.get(key) {
            Some(entity) => extract(entity).ok_or(WrongType),
            None => {
                let entity = create();
                let extracted = extract(&entity).ok_or(WrongType)?;
                entries.insert(key.to_string(), entity);
                self.shared.size.fetch_add(1, Ordering::Relaxed);
                Ok(extracted)
            }
        }
    }
}

impl Default for Store {
    fn default() -> Self {
        Store::new()
    }
}

fn fnv1a32(key: &str) -> u32 {
    const OFFSET_BASIS: u32 = 2_166_136_261;
    const PRIME: u32 = 16_777_619;

    let mut hash = OFFSET_BASIS;
    for byte in key.as_bytes() {
        hash ^= u32::from(*byte);
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}
