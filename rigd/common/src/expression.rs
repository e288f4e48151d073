use std::collections::HashMap;

use crate::smoothing::smooth_weight;

/// Morph-target weights of one mesh, addressed by target name.
#[derive(Debug, Clone, PartialEq)]
pub struct MorphMesh {
    name: String,
    dictionary: HashMap<String, usize>,
    influences: Vec<f32>,
}

impl MorphMesh {
    pub fn new<S: AsRef<str>>(name: &str, targets: &[S]) -> Self {
        let mut dictionary = HashMap::with_capacity(targets.len());
        for (i, target) in targets.iter().enumerate() {
            dictionary.entry(target.as_ref().to_string()).or_insert(i);
        }
        Self {
            name: name.to_string(),
            dictionary,
            influences: vec![0.0; targets.len()],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index_of(&self, target: &str) -> Option<usize> {
        self.dictionary.get(target).copied()
    }

    pub fn weight(&self, target: &str) -> Option<f32> {
        self.index_of(target).map(|i| self.influences[i])
    }

    pub fn set_weight(&mut self, target: &str, weight: f32) -> bool {
        match self.index_of(target) {
            Some(i) => {
                self.influences[i] = weight;
                true
            }
            None => false,
        }
    }

    pub fn influences(&self) -> &[f32] {
        &self.influences
    }

    /// Target names in influence order.
    pub fn target_names(&self) -> Vec<&str> {
        let mut names = vec![""; self.influences.len()];
        for (name, &i) in &self.dictionary {
            names[i] = name.as_str();
        }
        names
    }

    /// Steps each named weight toward its score by `factor`. Names this mesh
    /// does not expose are ignored. Returns how many weights were touched.
    pub fn apply_expression<'a, I>(&mut self, scores: I, factor: f32) -> usize
    where
        I: IntoIterator<Item = (&'a str, f32)>,
    {
        let mut applied = 0;
        for (name, score) in scores {
            if !score.is_finite() {
                continue;
            }
            if let Some(i) = self.index_of(name) {
                self.influences[i] = smooth_weight(self.influences[i], score, factor);
                applied += 1;
            }
        }
        applied
    }
}
