mod test_connection_basic;
mod test_intersect_basic;
mod test_refiner_basic;
