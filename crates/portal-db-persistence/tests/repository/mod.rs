mod application_test;
mod atomicity_test;
mod blockchain_test;
mod load_balancer_test;
