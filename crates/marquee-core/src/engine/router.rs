use marquee_types::NavigationTarget;

/// Receives the target of every commit, exactly once per commit.
pub trait Router: Send + Sync {
    fn navigate(&self, target: &NavigationTarget);
}

impl<F> Router for F
where
    F: Fn(&NavigationTarget) + Send + Sync,
{
    fn navigate(&self, target: &NavigationTarget) {
        self(target);
    }
}
