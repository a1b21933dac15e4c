mod dbvh_queries;
mod dbvh_random_updates;
