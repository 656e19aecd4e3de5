mod compose;
mod recovery;
