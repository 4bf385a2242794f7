//! Generic source → filters → sinks executor.
//!
//! A [`Source`] produces a mutable context, every [`Filter`] mutates it in
//! declaration order, then every [`Sink`] reads the final context in
//! declaration order. The first error aborts the run.

use tracing::{debug, info};

use super::PipelineError;

/// Produces the context a pipeline works on.
pub trait Source<C> {
    fn load(&self) -> Result<C, PipelineError>;

    /// Name used in log output.
    fn name(&self) -> &'static str {
        short_type_name::<Self>()
    }
}

/// Mutates the context in place.
///
/// A filter must leave the context structurally valid for the next one.
pub trait Filter<C> {
    fn apply(&self, context: &mut C) -> Result<(), PipelineError>;

    fn name(&self) -> &'static str {
        short_type_name::<Self>()
    }
}

/// Consumes the final context, typically by writing it somewhere.
pub trait Sink<C> {
    fn consume(&self, context: &C) -> Result<(), PipelineError>;

    fn name(&self) -> &'static str {
        short_type_name::<Self>()
    }
}

fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// A source, an ordered chain of filters and an ordered list of sinks.
pub struct Pipeline<C> {
    source: Box<dyn Source<C>>,
    filters: Vec<Box<dyn Filter<C>>>,
    sinks: Vec<Box<dyn Sink<C>>>,
}

impl<C> Pipeline<C> {
    pub fn new(source: impl Source<C> + 'static) -> Self {
        Self {
            source: Box::new(source),
            filters: Vec::new(),
            sinks: Vec::new(),
        }
    }

    /// Append a filter to the chain.
    pub fn add_filter(&mut self, filter: impl Filter<C> + 'static) -> &mut Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn add_sink(&mut self, sink: impl Sink<C> + 'static) -> &mut Self {
        self.sinks.push(Box::new(sink));
        self
    }

    /// Load, filter and sink, returning the final context.
    pub fn process(&self) -> Result<C, PipelineError> {
        info!(source = self.source.name(), "Loading");
        let mut context = self.source.load()?;

        for filter in &self.filters {
            debug!(filter = filter.name(), "Applying filter");
            filter.apply(&mut context)?;
        }

        for sink in &self.sinks {
            debug!(sink = sink.name(), "Consuming");
            sink.consume(&context)?;
        }

        Ok(context)
    }

    /// Like [`process`](Self::process), dropping the context afterwards.
    pub fn run(&self) -> Result<(), PipelineError> {
        self.process().map(drop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::SelectionError;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    struct Numbers(Log);

    impl Source<Vec<u32>> for Numbers {
        fn load(&self) -> Result<Vec<u32>, PipelineError> {
            self.0.borrow_mut().push("load".into());
            Ok(vec![1, 2, 3])
        }
    }

    struct Push(u32, Log);

    impl Filter<Vec<u32>> for Push {
        fn apply(&self, context: &mut Vec<u32>) -> Result<(), PipelineError> {
            self.1.borrow_mut().push(format!("push {}", self.0));
            context.push(self.0);
            Ok(())
        }
    }

    struct Fail;

    impl Filter<Vec<u32>> for Fail {
        fn apply(&self, _: &mut Vec<u32>) -> Result<(), PipelineError> {
            Err(SelectionError::LineNotFound("X".into()).into())
        }
    }

    struct Record(&'static str, Log);

    impl Sink<Vec<u32>> for Record {
        fn consume(&self, context: &Vec<u32>) -> Result<(), PipelineError> {
            self.1.borrow_mut().push(format!("{} {:?}", self.0, context));
            Ok(())
        }
    }

    #[test]
    fn stages_run_in_declaration_order() {
        let log = Log::default();
        let mut pipeline = Pipeline::new(Numbers(log.clone()));
        pipeline
            .add_filter(Push(4, log.clone()))
            .add_filter(Push(5, log.clone()))
            .add_sink(Record("first", log.clone()))
            .add_sink(Record("second", log.clone()));

        let context = pipeline.process().unwrap();
        assert_eq!(context, vec![1, 2, 3, 4, 5]);
        assert_eq!(
            *log.borrow(),
            vec![
                "load",
                "push 4",
                "push 5",
                "first [1, 2, 3, 4, 5]",
                "second [1, 2, 3, 4, 5]",
            ]
        );
    }

    #[test]
    fn error_aborts_the_run() {
        let log = Log::default();
        let mut pipeline = Pipeline::new(Numbers(log.clone()));
        pipeline
            .add_filter(Push(4, log.clone()))
            .add_filter(Fail)
            .add_filter(Push(5, log.clone()))
            .add_sink(Record("sink", log.clone()));

        let err = pipeline.run().unwrap_err();
        assert!(matches!(err, PipelineError::Selection(_)));
        assert_eq!(*log.borrow(), vec!["load", "push 4"]);
    }

    #[test]
    fn names_strip_module_path() {
        assert_eq!(Fail.name(), "Fail");
        assert_eq!(short_type_name::<Pipeline<Vec<u32>>>(), "Pipeline");
    }
}
