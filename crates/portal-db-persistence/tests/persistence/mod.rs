mod postgres_test;
