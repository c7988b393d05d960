use crate::tensor::Tensor;

#[test]
fn test_print() {
    use std::fmt::Write;

    // 测试向量
    let tensor = Tensor::new(&[1.0, 2.0, 3.0], &[3]);
    let mut buffer = String::new();
    write!(&mut buffer, "{}", tensor).unwrap();
    assert_eq!(buffer, "[  1.0000,   2.0000,   3.0000]\n形状: [3]");

    // 测试矩阵
    let tensor = Tensor::new(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]);
    let mut buffer = String::new();
    write!(&mut buffer, "{}", tensor).unwrap();
    assert_eq!(
        buffer,
        "[[  1.0000,   2.0000,   3.0000], \n [  4.0000,   5.0000,   6.0000]]\n形状: [2, 3]"
    );

    // 阶数大于2的张量不展示数据
    let tensor = Tensor::zeros(&[1, 2, 2]);
    assert!(tensor.to_string().contains("无法展示具体数据"));
}
