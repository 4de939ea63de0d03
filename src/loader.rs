//! Asynchronous texture streaming
//!
//! Every slot starts bound to the black placeholder. Decoding happens on
//! background threads; finished images arrive over a channel and are swapped
//! into the [`TextureSet`] between frames by [`TextureLoader::apply`].

use std::fmt;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use crate::error::Error;
use crate::texture::Texture;

/// Logical sampler names the shading pipeline reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    Diffuse,
    Bump,
    Night,
    Spec,
    Clouds,
    Sky,
}

impl TextureSlot {
    pub const ALL: [TextureSlot; 6] = [
        TextureSlot::Diffuse,
        TextureSlot::Bump,
        TextureSlot::Night,
        TextureSlot::Spec,
        TextureSlot::Clouds,
        TextureSlot::Sky,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            TextureSlot::Diffuse => 0,
            TextureSlot::Bump => 1,
            TextureSlot::Night => 2,
            TextureSlot::Spec => 3,
            TextureSlot::Clouds => 4,
            TextureSlot::Sky => 5,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            TextureSlot::Diffuse => "diffuse",
            TextureSlot::Bump => "bump",
            TextureSlot::Night => "night",
            TextureSlot::Spec => "spec",
            TextureSlot::Clouds => "clouds",
            TextureSlot::Sky => "sky",
        }
    }

    /// Color images are authored in sRGB; data maps hold linear values.
    /// Both are sampled as raw channel values.
    pub const fn is_color(self) -> bool {
        matches!(
            self,
            TextureSlot::Diffuse | TextureSlot::Night | TextureSlot::Sky
        )
    }
}

impl fmt::Display for TextureSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The six textures bound for a frame.
#[derive(Clone, Default)]
pub struct TextureSet {
    textures: [Texture; 6],
}

impl TextureSet {
    /// All slots bound to the placeholder
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, slot: TextureSlot) -> &Texture {
        &self.textures[slot.index()]
    }

    pub fn set(&mut self, slot: TextureSlot, texture: Texture) {
        self.textures[slot.index()] = texture;
    }

    #[inline]
    pub fn diffuse(&self) -> &Texture {
        self.get(TextureSlot::Diffuse)
    }

    #[inline]
    pub fn bump(&self) -> &Texture {
        self.get(TextureSlot::Bump)
    }

    #[inline]
    pub fn night(&self) -> &Texture {
        self.get(TextureSlot::Night)
    }

    #[inline]
    pub fn spec(&self) -> &Texture {
        self.get(TextureSlot::Spec)
    }

    #[inline]
    pub fn clouds(&self) -> &Texture {
        self.get(TextureSlot::Clouds)
    }

    #[inline]
    pub fn sky(&self) -> &Texture {
        self.get(TextureSlot::Sky)
    }
}

/// Outcome of one background decode
pub enum LoadEvent {
    Loaded(TextureSlot, Texture),
    Failed(TextureSlot, Error),
}

/// Streams texture files in the background
pub struct TextureLoader {
    receiver: Receiver<LoadEvent>,
    pending: usize,
    _threads: Vec<thread::JoinHandle<()>>,
}

impl TextureLoader {
    /// Start decoding every `(slot, path)` pair on its own thread.
    pub fn spawn(requests: Vec<(TextureSlot, PathBuf)>) -> Self {
        let (sender, receiver) = mpsc::channel();
        let pending = requests.len();

        let threads = requests
            .into_iter()
            .map(|(slot, path)| {
                let sender = sender.clone();
                thread::spawn(move || Self::decode(slot, path, &sender))
            })
            .collect();

        Self {
            receiver,
            pending,
            _threads: threads,
        }
    }

    fn decode(slot: TextureSlot, path: PathBuf, sender: &Sender<LoadEvent>) {
        tracing::debug!(%slot, path = %path.display(), "decoding texture");
        let event = match Texture::load(&path) {
            Ok(texture) => LoadEvent::Loaded(slot, texture),
            Err(e) => LoadEvent::Failed(slot, e),
        };
        // Receiver gone means the viewer is shutting down
        let _ = sender.send(event);
    }

    /// Get any finished decodes (non-blocking)
    pub fn poll(&mut self) -> Vec<LoadEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.receiver.try_recv() {
            self.pending = self.pending.saturating_sub(1);
            events.push(event);
        }
        events
    }

    /// Swap finished textures into `set`. Failed slots keep the placeholder.
    /// Returns the number of slots updated.
    pub fn apply(&mut self, set: &mut TextureSet) -> usize {
        let mut updated = 0;
        for event in self.poll() {
            match event {
                LoadEvent::Loaded(slot, texture) => {
                    tracing::info!(
                        %slot,
                        width = texture.width(),
                        height = texture.height(),
                        color = slot.is_color(),
                        "texture streamed in"
                    );
                    set.set(slot, texture);
                    updated += 1;
                },
                LoadEvent::Failed(slot, e) => {
                    tracing::warn!(%slot, error = %e, "texture unavailable, keeping placeholder");
                },
            }
        }
        updated
    }

    pub fn is_finished(&self) -> bool {
        self.pending == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn test_slot_indices_unique() {
        for (i, slot) in TextureSlot::ALL.iter().enumerate() {
            assert_eq!(slot.index(), i);
        }
    }

    #[test]
    fn test_new_set_is_placeholder() {
        let set = TextureSet::new();
        for slot in TextureSlot::ALL {
            assert_eq!(set.get(slot).sample(0.3, 0.7), [0.0, 0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn test_set_replaces_single_slot() {
        let mut set = TextureSet::new();
        set.set(TextureSlot::Spec, Texture::solid(255, 255, 255));
        assert_eq!(set.spec().sample_red(0.5, 0.5), 1.0);
        assert_eq!(set.diffuse().sample_red(0.5, 0.5), 0.0);
    }

    #[test]
    fn test_missing_file_keeps_placeholder() {
        let path = std::env::temp_dir().join("globe-test-missing-texture.png");
        let mut loader = TextureLoader::spawn(vec![(TextureSlot::Sky, path)]);
        let mut set = TextureSet::new();

        let deadline = Instant::now() + Duration::from_secs(5);
        while !loader.is_finished() && Instant::now() < deadline {
            assert_eq!(loader.apply(&mut set), 0);
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(loader.is_finished());
        assert_eq!(set.sky().sample(0.1, 0.1), [0.0, 0.0, 0.0, 1.0]);
    }
}
