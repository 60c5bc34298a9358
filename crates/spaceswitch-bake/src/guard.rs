//! Scoped undo chunk and viewport suppression.

use std::ops::{Deref, DerefMut};

use crate::scene::AnimatedScene;

/// Holds an undo chunk open and viewport redraws off for as long as it
/// lives. Both are released exactly once on drop, on every exit path.
pub struct SceneGuard<'a, S: AnimatedScene + ?Sized> {
    scene: &'a mut S,
}

impl<'a, S: AnimatedScene + ?Sized> SceneGuard<'a, S> {
    /// Opens the undo chunk, then suppresses the viewport.
    pub fn acquire(scene: &'a mut S) -> Self {
        scene.begin_undo_chunk();
        scene.suppress_viewport();
        Self { scene }
    }
}

impl<S: AnimatedScene + ?Sized> Deref for SceneGuard<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.scene
    }
}

impl<S: AnimatedScene + ?Sized> DerefMut for SceneGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.scene
    }
}

impl<S: AnimatedScene + ?Sized> Drop for SceneGuard<'_, S> {
    fn drop(&mut self) {
        self.scene.restore_viewport();
        self.scene.end_undo_chunk();
    }
}
