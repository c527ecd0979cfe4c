use quizclock_types::ClockFace;

/// Where the countdown is drawn. Rendering cannot fail from the session's
/// point of view; sinks log their own problems.
pub trait RenderSink {
    fn render(&mut self, face: &ClockFace);
}

/// `None` stands for a missing display target: renders are dropped.
impl<R: RenderSink> RenderSink for Option<R> {
    fn render(&mut self, face: &ClockFace) {
        if let Some(sink) = self {
            sink.render(face);
        }
    }
}

impl<R: RenderSink + ?Sized> RenderSink for Box<R> {
    fn render(&mut self, face: &ClockFace) {
        (**self).render(face);
    }
}
