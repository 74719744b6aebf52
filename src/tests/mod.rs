
mod test_bucket_key;
mod test_sweeper;
