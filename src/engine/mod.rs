pub mod letter_stats;
pub mod selection;

use std::cell::RefCell;
use std::rc::Rc;

use letter_stats::LetterStatsBook;

/// Stats shared between the local word source and the local reporter.
pub type SharedStats = Rc<RefCell<LetterStatsBook>>;

pub fn shared_stats(book: LetterStatsBook) -> SharedStats {
    Rc::new(RefCell::new(book))
}
