pub mod reversetext;
