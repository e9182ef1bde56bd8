use ndarray::{Array2, ArrayView1};

pub struct MatrixHelper;

impl MatrixHelper {
    /// Outer product `a * b^T`, shape `(a.len(), b.len())`.
    pub fn outer(a: ArrayView1<f64>, b: ArrayView1<f64>) -> Array2<f64> {
        Array2::from_shape_fn((a.len(), b.len()), |(i, j)| a[i] * b[j])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn outer_product_shape_and_values() {
        let a = array![1.0, 2.0];
        let b = array![3.0, 4.0, 5.0];
        let m = MatrixHelper::outer(a.view(), b.view());
        assert_eq!(m.dim(), (2, 3));
        assert_eq!(m[[1, 2]], 10.0);
    }
}
