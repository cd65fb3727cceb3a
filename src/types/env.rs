use std::collections::HashMap;

type Frame<T> = HashMap<String, T>;

/// A chain of name -> value frames, innermost last.
///
/// Both the checker (holding symbol entries) and the VM (holding runtime values) use
/// this. The root frame is never popped, so a binding made there lives as long as the
/// environment.
#[derive(Debug, Clone)]
pub struct Env<T> {
    frames: Vec<Frame<T>>,
}

impl<T> Default for Env<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Env<T> {
    pub fn new() -> Self {
        Self {
            frames: vec![HashMap::new()],
        }
    }

    /// Enter a new child frame
    pub fn enter(&mut self) {
        self.frames.push(HashMap::new());
    }

    /// Leave the current frame. The root frame stays.
    pub fn leave(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Resolve a name by searching from the innermost to the outermost frame
    pub fn resolve(&self, name: &str) -> Option<&T> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }

    /// Only the innermost frame.
    pub fn local(&self, name: &str) -> Option<&T> {
        self.current().get(name)
    }

    pub fn local_mut(&mut self, name: &str) -> Option<&mut T> {
        self.current_mut().get_mut(name)
    }

    /// Bind in the innermost frame, replacing a binding of the same name there.
    pub fn add(&mut self, name: impl Into<String>, value: T) {
        self.current_mut().insert(name.into(), value);
    }

    fn current(&self) -> &Frame<T> {
        &self.frames[self.frames.len() - 1]
    }

    fn current_mut(&mut self) -> &mut Frame<T> {
        let top = self.frames.len() - 1;
        &mut self.frames[top]
    }
}

impl<T: Clone> Env<T> {
    /// Every visible binding collapsed into a single frame, inner bindings winning.
    pub fn flatten(&self) -> HashMap<String, T> {
        let mut flat = HashMap::new();
        for frame in &self.frames {
            for (name, value) in frame {
                flat.insert(name.clone(), value.clone());
            }
        }
        flat
    }

    /// A fresh environment whose root frame is `bindings`.
    pub fn from_bindings(bindings: HashMap<String, T>) -> Self {
        Self {
            frames: vec![bindings],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shadowing_and_restore() {
        let mut env = Env::new();
        env.add("a", 1);
        env.enter();
        env.add("a", 2);
        assert_eq!(env.resolve("a"), Some(&2));
        env.leave();
        assert_eq!(env.resolve("a"), Some(&1));
    }

    #[test]
    fn test_child_does_not_touch_parent() {
        let mut env = Env::new();
        env.enter();
        env.add("b", 1);
        env.leave();
        assert_eq!(env.resolve("b"), None);
    }

    #[test]
    fn test_root_frame_survives_leave() {
        let mut env = Env::new();
        env.add("a", 1);
        env.leave();
        env.leave();
        assert_eq!(env.depth(), 1);
        assert_eq!(env.resolve("a"), Some(&1));
    }

    #[test]
    fn test_flatten_prefers_inner() {
        let mut env = Env::new();
        env.add("a", 1);
        env.add("b", 1);
        env.enter();
        env.add("a", 2);
        let flat = env.flatten();
        assert_eq!(flat.get("a"), Some(&2));
        assert_eq!(flat.get("b"), Some(&1));
    }
}
