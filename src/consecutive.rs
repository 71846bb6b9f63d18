use crate::overrides::Reply;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use stubkit_mock::{Behavior, Invocation, Result, Value};

/// Replies handed out one per call, in order.
///
/// Clones share the queue. Once the queue is empty every further call yields
/// [`Value::Null`].
#[derive(Clone)]
pub struct ConsecutiveMap {
    queue: Rc<RefCell<VecDeque<Reply>>>,
    last: Rc<RefCell<Value>>,
}

impl ConsecutiveMap {
    pub fn new<I, R>(replies: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Reply>,
    {
        Self {
            queue: Rc::new(RefCell::new(replies.into_iter().map(Into::into).collect())),
            last: Rc::new(RefCell::new(Value::Null)),
        }
    }

    pub fn remaining(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.queue.borrow().is_empty()
    }

    /// Independent queue seeded with the replies still pending here.
    pub fn fork(&self) -> Self {
        Self::new(self.queue.borrow().iter().cloned())
    }
}

impl Behavior for ConsecutiveMap {
    fn invoke(&self, invocation: &Invocation) -> Result<Value> {
        // Released before running the reply; it may call the mock again.
        let next = self.queue.borrow_mut().pop_front();
        let value = match next {
            Some(Reply::Value(value)) => value,
            Some(Reply::Callback(callback)) => callback.call(&invocation.args)?,
            Some(Reply::Behavior(behavior)) => behavior.invoke(invocation)?,
            None => Value::Null,
        };
        *self.last.borrow_mut() = value.clone();
        Ok(value)
    }

    fn describe(&self) -> String {
        format!("return user-specified value {}", self.last.borrow().export())
    }
}

/// Stubs a method to return `replies` in order, one per call.
///
/// ```
/// use stubkit::consecutive;
///
/// let names = consecutive(["david", "emma", "sam", "amy"]);
/// assert_eq!(names.remaining(), 4);
/// ```
pub fn consecutive<I, R>(replies: I) -> ConsecutiveMap
where
    I: IntoIterator<Item = R>,
    R: Into<Reply>,
{
    ConsecutiveMap::new(replies)
}

/// Mixed-type form of [`consecutive`]: each element converts into a
/// [`Reply`] on its own.
///
/// ```
/// use stubkit::consecutive;
/// use stubkit::mock::ReturnSelf;
///
/// let replies = consecutive![1, "two", ReturnSelf];
/// assert_eq!(replies.remaining(), 3);
/// ```
#[macro_export]
macro_rules! consecutive {
    ($($reply:expr),* $(,)?) => {
        $crate::ConsecutiveMap::new(::std::vec![$($crate::Reply::from($reply)),*])
    };
}
