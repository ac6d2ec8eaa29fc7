/// Named contributions to a generated list
///
/// Each builder that feeds into an env list, a mount list, a volume list or
/// the init container list records its output under one of these.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    // environment
    /// The six variables every site container gets
    Builtin,
    /// Anything the site owner listed
    User,
    /// Bucket url and remapped backend credentials
    Media,
    /// Reference to the generated secret
    GeneratedSecret,
    /// Clone url, destination and ref for the git step
    GitClone,
    /// Extra env or env-from of the git source
    CodeSource,
    /// Extra env or env-from of the bootstrap spec
    Bootstrap,

    // volumes and mounts
    /// Internal scratch and log volumes
    Auxiliary,
    /// Log volume mount
    Logs,
    /// The code volume or its three mounts
    Code,
    /// The media volume or its mount
    MediaMount,

    // init containers
    VolumePrep,
    UserInit,
    CodeFetch,
    Install,
}

/// An ordered list built from named stages
///
/// Stages are kept in the order they were added, and so are the items within
/// them. Adding the same stage twice records it twice.
#[derive(Clone, Debug, PartialEq)]
pub struct Staged<T> {
    stages: Vec<(Stage, Vec<T>)>,
}

impl<T> Default for Staged<T> {
    fn default() -> Self {
        Staged { stages: vec![] }
    }
}

impl<T> Staged<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a contribution
    pub fn push<I: IntoIterator<Item = T>>(&mut self, stage: Stage, items: I) {
        self.stages.push((stage, items.into_iter().collect()));
    }

    /// Record a contribution, builder style
    pub fn then<I: IntoIterator<Item = T>>(mut self, stage: Stage, items: I) -> Self {
        self.push(stage, items);
        self
    }

    /// Append all stages of another plan after ours
    pub fn chain(mut self, other: Staged<T>) -> Self {
        self.stages.extend(other.stages);
        self
    }

    /// Stage names in the order they were recorded
    pub fn stages(&self) -> Vec<Stage> {
        self.stages.iter().map(|(s, _)| *s).collect()
    }

    /// Items contributed by the first occurrence of a stage
    pub fn get(&self, stage: Stage) -> &[T] {
        self.stages
            .iter()
            .find(|(s, _)| *s == stage)
            .map(|(_, xs)| xs.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains(&self, stage: Stage) -> bool {
        self.stages.iter().any(|(s, _)| *s == stage)
    }

    pub fn len(&self) -> usize {
        self.stages.iter().map(|(_, xs)| xs.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter<'a>(&'a self) -> impl Iterator<Item = &'a T> + 'a {
        self.stages.iter().flat_map(|(_, xs)| xs.iter())
    }

    /// Flatten into the final list
    pub fn into_vec(self) -> Vec<T> {
        self.into_iter().collect()
    }
}

impl<T> IntoIterator for Staged<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        let items: Vec<T> = self.stages.into_iter().flat_map(|(_, xs)| xs).collect();
        items.into_iter()
    }
}
