use std::any::{Any, TypeId};
use std::collections::{BTreeMap, HashMap};
use std::ops::{Deref, DerefMut};
use std::sync::Mutex;

use crate::action::AgentAction;
use crate::registry::Registry;
use crate::tag::Tag;
use crate::world::WorldMut;

/// Scoped reusable buffers and pooled action instances.
///
/// Borrowed containers are cleared on acquire (not on release, so stale
/// entries can never be observed) and returned on every exit path by the
/// guard's `Drop`. Free lists never shrink; steady-state updates allocate
/// nothing once the pool is warm.
pub struct Pool<W: WorldMut> {
    buffers: BufferPool,
    actions: Mutex<HashMap<Tag, Vec<Box<dyn AgentAction<W>>>>>,
}

impl<W: WorldMut> Default for Pool<W> {
    fn default() -> Self {
        Self {
            buffers: BufferPool::default(),
            actions: Mutex::new(HashMap::new()),
        }
    }
}

impl<W: WorldMut> Pool<W> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow a cleared scratch `Vec<T>`.
    pub fn vec<T: Send + 'static>(&self) -> PooledVec<'_, T> {
        let mut buf = self.buffers.acquire::<Vec<T>>();
        buf.clear();
        PooledVec {
            buf: Some(buf),
            pool: &self.buffers,
        }
    }

    /// Borrow a cleared scratch `BTreeMap<K, V>`.
    pub fn map<K, V>(&self) -> PooledMap<'_, K, V>
    where
        K: Ord + Send + 'static,
        V: Send + 'static,
    {
        let mut buf = self.buffers.acquire::<BTreeMap<K, V>>();
        buf.clear();
        PooledMap {
            buf: Some(buf),
            pool: &self.buffers,
        }
    }

    /// Take an idle instance for `tag`, instantiating through the registered
    /// action class when the free list is empty. Returns `None` when no class
    /// is registered for the tag.
    pub fn reserve_action(
        &self,
        registry: &Registry<W>,
        tag: &Tag,
    ) -> Option<Box<dyn AgentAction<W>>> {
        if let Some(instance) = self
            .actions
            .lock()
            .expect("pool lock poisoned")
            .get_mut(tag)
            .and_then(Vec::pop)
        {
            return Some(instance);
        }
        registry.action_class(tag).map(|class| class.instantiate())
    }

    /// Return an instance to the free list, reset to idle.
    pub fn release_action(&self, tag: &Tag, mut instance: Box<dyn AgentAction<W>>) {
        instance.reset();
        self.actions
            .lock()
            .expect("pool lock poisoned")
            .entry(tag.clone())
            .or_default()
            .push(instance);
    }
}

#[derive(Default)]
struct BufferPool {
    free: Mutex<HashMap<TypeId, Vec<Box<dyn Any + Send>>>>,
}

impl BufferPool {
    fn acquire<T: Default + Any + Send>(&self) -> Box<T> {
        let recycled = self
            .free
            .lock()
            .expect("pool lock poisoned")
            .get_mut(&TypeId::of::<T>())
            .and_then(Vec::pop);
        match recycled.map(|boxed| boxed.downcast::<T>()) {
            Some(Ok(buf)) => buf,
            _ => Box::new(T::default()),
        }
    }

    fn release(&self, id: TypeId, boxed: Box<dyn Any + Send>) {
        self.free
            .lock()
            .expect("pool lock poisoned")
            .entry(id)
            .or_default()
            .push(boxed);
    }
}

/// RAII guard over a pooled `Vec<T>`.
pub struct PooledVec<'a, T: Send + 'static> {
    buf: Option<Box<Vec<T>>>,
    pool: &'a BufferPool,
}

impl<T: Send + 'static> Deref for PooledVec<'_, T> {
    type Target = Vec<T>;

    fn deref(&self) -> &Vec<T> {
        self.buf.as_ref().expect("pooled buffer taken")
    }
}

impl<T: Send + 'static> DerefMut for PooledVec<'_, T> {
    fn deref_mut(&mut self) -> &mut Vec<T> {
        self.buf.as_mut().expect("pooled buffer taken")
    }
}

impl<T: Send + 'static> Drop for PooledVec<'_, T> {
    fn drop(&mut self) {
        if let Some(buf) = self.buf.take() {
            self.pool.release(TypeId::of::<Vec<T>>(), buf);
        }
    }
}

/// RAII guard over a pooled `BTreeMap<K, V>`.
pub struct PooledMap<'a, K: Ord + Send + 'static, V: Send + 'static> {
    buf: Option<Box<BTreeMap<K, V>>>,
    pool: &'a BufferPool,
}

impl<K: Ord + Send + 'static, V: Send + 'static> Deref for PooledMap<'_, K, V> {
    type Target = BTreeMap<K, V>;

    fn deref(&self) -> &BTreeMap<K, V> {
        self.buf.as_ref().expect("pooled buffer taken")
    }
}

impl<K: Ord + Send + 'static, V: Send + 'static> DerefMut for PooledMap<'_, K, V> {
    fn deref_mut(&mut self) -> &mut BTreeMap<K, V> {
        self.buf.as_mut().expect("pooled buffer taken")
    }
}

impl<K: Ord + Send + 'static, V: Send + 'static> Drop for PooledMap<'_, K, V> {
    fn drop(&mut self) {
        if let Some(buf) = self.buf.take() {
            self.pool.release(TypeId::of::<BTreeMap<K, V>>(), buf);
        }
    }
}
