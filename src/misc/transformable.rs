/// Objects that can be moved into another space by a transform of type `M`
pub trait Transformable<M>: Clone {
    fn transform(&mut self, transform: M);

    fn transformed(&self, transform: M) -> Self {
        let mut moved = self.clone();
        moved.transform(transform);
        moved
    }
}
