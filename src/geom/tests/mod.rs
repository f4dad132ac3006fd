mod test_curve_basic;
mod test_surface_basic;
